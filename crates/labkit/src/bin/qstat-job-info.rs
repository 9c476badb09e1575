//! Show owner, runtime limit and working directory of SGE jobs.

use clap::Parser;
use labkit_cli::{init_tracing, QstatArgs};
use labkit_parsers::{good_path_repr, parse_time, repr_time, GOOD_PATH_LEN};
use labkit_qstat::{local_hostname, QstatCache};
use miette::{IntoDiagnostic, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = QstatArgs::parse();

    let hostname = local_hostname().await.into_diagnostic()?;
    let mut cache = QstatCache::new(hostname);

    for job_id in args.job_ids {
        let Some(info) = cache.get(job_id).await.into_diagnostic()? else {
            println!("{}\tdoes not exist", job_id);
            continue;
        };

        let runtime = info
            .hard_resource("h_rt")
            .and_then(parse_time)
            .map(repr_time)
            .unwrap_or_else(|| "-".to_string());
        let cwd = if args.short {
            good_path_repr(info.job_cwd(), GOOD_PATH_LEN)
        } else {
            info.job_cwd().unwrap_or("-").to_string()
        };
        println!(
            "{}\t{}\t{}\t{}\t{}",
            job_id,
            info.get("owner").unwrap_or("-"),
            info.get("job_name").unwrap_or("-"),
            runtime,
            cwd
        );
    }
    Ok(())
}
