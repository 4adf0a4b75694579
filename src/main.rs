//! Manifold census binary executable.
//!
//! Parses the command line and runs either a parameter sweep or a single
//! triangulation.

use manifold_census::{CensusCli, run};

fn main() {
    // Initialize logging
    env_logger::init();

    let cli = CensusCli::from_args();
    match run(&cli) {
        Ok(()) => {
            log::info!("Census completed successfully");
        }
        Err(e) => {
            log::error!("Census failed: {e}");
            std::process::exit(1);
        }
    }
}
