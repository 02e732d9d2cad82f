use channelsmith::app;
use channelsmith::shared::logging::init_logging;

fn run() -> Result<(), String> {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = app::run_cli(args)?;
    println!("{output}");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
