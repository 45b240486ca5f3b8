use std::env;
use std::process;

use tacw_driver::interp;
use tacw_driver::runner;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();

    // Emitted stubs re-enter the wrapper here; no environment capture or
    // argument translation applies in this mode.
    if args.first().map(String::as_str) == Some(interp::INTERP_EXEC_FLAG) {
        process::exit(interp::run_embedded(&args[1..]));
    }

    process::exit(runner::run(&args));
}
