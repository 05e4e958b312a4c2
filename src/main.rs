//! Gemlight entry point
//!
//! Native: generates a puzzle and prints what every emitter sees.
//! Usage: `gemlight [difficulty] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    use gemlight::sim::{Puzzle, trace_all};
    use gemlight::{Difficulty, Settings};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(name) => match Difficulty::from_str(&name) {
            Some(Difficulty::Custom) | None => {
                eprintln!("unknown difficulty {name:?} (training, normal, medium, hard)");
                return ExitCode::FAILURE;
            }
            Some(d) => d,
        },
        None => Difficulty::Normal,
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            eprintln!("bad seed: {e}");
            return ExitCode::FAILURE;
        }
        None => 0,
    };

    log::info!("Gemlight (native) {} seed {seed}", difficulty.as_str());
    let settings = Settings::from_difficulty(difficulty);
    let puzzle = match Puzzle::from_difficulty(settings.clone(), seed) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("could not generate a puzzle: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}\n", puzzle.secret_board().render());
    for (emitter, result) in trace_all(puzzle.secret_board(), settings.max_trace_steps) {
        println!(
            "{emitter:>4} -> {:<8} {}",
            result.exit.to_string(),
            result.display_color().name
        );
    }

    match serde_json::to_string_pretty(puzzle.secret()) {
        Ok(json) => println!("\n{json}"),
        Err(e) => {
            eprintln!("could not serialize layout: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `platform::web::start`
}
