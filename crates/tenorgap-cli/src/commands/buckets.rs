use clap::Args;
use serde_json::Value;

use tenorgap_core::aggregate::{self, BucketShape};
use tenorgap_core::bucket::Taxonomy;

use crate::commands::{LoanArgs, ValueMode};

/// Arguments for the single-loan bucket breakdown
#[derive(Args)]
pub struct BucketsArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Bucket taxonomy: irrbb | lcr | nsfr
    #[arg(long, default_value = "irrbb")]
    pub taxonomy: String,

    /// Which value field to aggregate
    #[arg(long, value_enum, default_value = "total")]
    pub value: ValueMode,

    /// Use the flattened (one column per bucket) export shape
    #[arg(long)]
    pub flattened: bool,
}

pub fn run_buckets(args: BucketsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.loan.to_loan()?;
    let taxonomy = Taxonomy::parse(&args.taxonomy)?;
    let shape = if args.flattened {
        BucketShape::Flattened
    } else {
        BucketShape::Tall
    };

    let output = aggregate::bucket_breakdown(&loan, taxonomy, args.value.into(), shape)?;
    Ok(serde_json::to_value(output)?)
}
