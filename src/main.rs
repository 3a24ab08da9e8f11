fn is_json_mode_args() -> bool {
    std::env::args().any(|arg| arg == "--json")
}

fn report(err: &taskdeck::CliError, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": err });
        eprintln!("{payload}");
    } else if err.code == 0 {
        // --help / --version come through the error path with a success code.
        print!("{}", err.message);
    } else {
        eprintln!("{err}");
    }
}

fn main() {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();

    let cli = match taskdeck::parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            report(&err, is_json_mode_args() && err.code != 0);
            std::process::exit(err.code);
        }
    };

    let json = cli.command.wants_json();
    if let Err(err) = taskdeck::run(cli) {
        report(&err, json);
        std::process::exit(err.code);
    }
}
