use std::time::Instant;

use interceptor_log_kit::nop::NopLogger;
use interceptor_log_kit::{fields, interceptor_logger, Logger};

#[tokio::main]
async fn main() {
    let logger = interceptor_logger(NopLogger).with(fields!["service" => "load"]);

    let n: u64 = 1_000_000;
    let start = Instant::now();

    let mut handles = Vec::new();
    for worker in 0..4u64 {
        let logger = logger.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..n / 4 {
                logger.info(&fields!["worker" => worker, "iteration" => i, "msg" => "finished call"]);
            }
        }));
    }
    for handle in handles {
        handle.await.expect("load worker");
    }

    let elapsed = start.elapsed();
    println!("nop logger: sent {} lines in {:?} (~{:.0} lines/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
