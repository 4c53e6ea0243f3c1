use sales_report::generator::{self, GeneratorConfig};
use sales_report::layout::Layout;

fn main() {
    env_logger::init();
    let mut rng = rand::thread_rng();
    let summary = generator::run(&Layout::default(), &GeneratorConfig::default(), &mut rng);
    println!("{} files written, {} failed", summary.written.len(), summary.failed.len());
}
