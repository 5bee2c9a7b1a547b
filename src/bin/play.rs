use stacker_core::{Renderer, Session, SessionConfig, StepResult, TextRenderer};

fn main() {
    let mut config: Option<SessionConfig> = None;
    let mut seed: Option<u64> = None;
    let mut turns: Option<u32> = None;
    let mut every: u64 = 0;
    let mut show_levels = false;
    let mut fog = true;
    let mut quiet = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => seed = args.next().and_then(|v| v.parse().ok()),
            "--preset" => config = Some(load_preset(&args.next().unwrap_or_default())),
            "--config" => config = Some(load_config(&args.next().unwrap_or_default())),
            "--turns" => turns = args.next().and_then(|v| v.parse().ok()),
            "--every" => every = args.next().and_then(|v| v.parse().ok()).unwrap_or(0),
            "--levels" => show_levels = true,
            "--truth" => fog = false,
            "--quiet" => quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("unknown argument: {other}");
                print_usage();
                std::process::exit(2);
            }
        }
    }

    let mut config = config.unwrap_or_default();
    if seed.is_some() {
        config.seed = seed;
    }
    if turns.is_some() {
        config.max_turns = turns;
    }

    let mut session = Session::new(config);
    println!("seed: {}", session.seed());

    let renderer = TextRenderer {
        show_legend: false,
        show_levels,
        fog_of_war: fog,
    };

    loop {
        let result = session.step();

        if !quiet {
            for event in &result.events {
                println!("[{:>5}] {}", result.state.turn, event);
            }
        }
        if every > 0 && result.state.turn % every == 0 {
            if let Ok(text) = renderer.render(&result.state) {
                println!("{text}");
            }
        }

        if result.done {
            if let Ok(text) = renderer.render(&result.state) {
                println!("\n{text}");
            }
            print_summary(&session, &result);
            break;
        }
    }
}

fn load_preset(name: &str) -> SessionConfig {
    match name {
        "open_field" => SessionConfig::open_field(),
        "walled" => SessionConfig::walled(),
        "quick" => SessionConfig::quick(),
        other => {
            eprintln!("unknown preset: {other} (try open_field, walled, quick)");
            std::process::exit(2);
        }
    }
}

fn load_config(path: &str) -> SessionConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read {path}: {err}");
            std::process::exit(2);
        }
    };
    let parsed = if path.ends_with(".yaml") || path.ends_with(".yml") {
        SessionConfig::from_yaml_str(&text).map_err(|e| e.to_string())
    } else {
        SessionConfig::from_toml_str(&text).map_err(|e| e.to_string())
    };
    match parsed {
        Ok(config) => config,
        Err(err) => {
            eprintln!("cannot parse {path}: {err}");
            std::process::exit(2);
        }
    }
}

fn print_summary(session: &Session, result: &StepResult) {
    let state = &result.state;
    println!("=== Session over after {} turns ===", state.turn);
    println!("Reason: {:?}", result.done_reason);
    println!(
        "Phase: {:?} | Position: ({}, {}) | Carrying: {}",
        state.phase, state.position.0, state.position.1, state.carrying
    );
    println!(
        "Known: {} cells | Visited: {} cells",
        state.tiles_known, state.cells_visited
    );
    if let Some(gold) = session.world().gold() {
        println!(
            "Gold at ({}, {}) | Reached: {}",
            gold.0,
            gold.1,
            session.world().gold_reached()
        );
    }
}

fn print_usage() {
    println!("stacker headless runner");
    println!();
    println!("usage: play [options]");
    println!("  --seed N        world seed (default: random)");
    println!("  --preset NAME   open_field | walled | quick");
    println!("  --config PATH   load a .toml or .yaml config");
    println!("  --turns N       override the turn limit");
    println!("  --every N       render the view every N turns");
    println!("  --levels        draw elevations as digits");
    println!("  --truth         disable fog of war");
    println!("  --quiet         suppress per-turn events");
}
