//! Interactive views of fixed-point iteration.
//!
//! # Usage
//!
//! ```text
//! cargo run --example plot --features plot -- trace "x**2 - 2" 1.0
//! cargo run --example plot --features plot -- compare "cos(x) - x" 0.5
//! ```
//!
//! # Modes
//!
//! - **trace <f> [x0]** — Solve with the first candidate g(x) that converges
//!   and plot x, g(x) and the step error per iteration.
//!
//! - **compare <f> [x0]** — Run every candidate g(x) and overlay their step
//!   errors on a log scale, showing which rearrangements converge and how fast.

use std::error::Error;

use fixpoint_observers::{PlotObserver, ShowConfig, StallGuard};
use fixpoint_solvers::{
    VARIABLE,
    candidates::{self, Candidate},
    fixed_point::{self, Config, Event, Status},
};
use fixpoint_symbolic::Function;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "trace".into());
    let equation = args.next().unwrap_or_else(|| "x**2 - 2".into());
    let x0 = match args.next().as_deref().map(str::parse::<f64>).transpose() {
        Ok(x0) => x0.unwrap_or(1.0),
        Err(_) => {
            eprintln!("Invalid initial guess, expected a number such as 1.0");
            std::process::exit(1);
        }
    };

    let candidates = candidates::generate(&equation);
    if candidates.is_empty() {
        eprintln!("No g(x) candidates for: {equation}");
        std::process::exit(1);
    }

    match mode.as_str() {
        "trace" => trace(&equation, &candidates, x0),
        "compare" => compare(&equation, &candidates, x0),
        other => {
            eprintln!("Unknown mode: {other}");
            eprintln!("Usage: plot [trace|compare] <f(x)> [x0]");
            std::process::exit(1);
        }
    }
}

fn config() -> Config {
    Config::default()
}

/// Plots the run of the first candidate that converges.
fn trace(equation: &str, candidates: &[Candidate], x0: f64) -> Result<(), Box<dyn Error>> {
    for candidate in candidates {
        let g = Function::new(candidate.expr.clone(), VARIABLE);
        let mut obs = PlotObserver::new(["x", "g(x)", "Error"]);

        let Ok(solution) = fixed_point::solve(&g, x0, &config(), &mut obs) else {
            continue;
        };
        if solution.status != Status::Converged {
            continue;
        }

        println!("{}", candidate.label());
        println!("  g(x) = {}", candidate.expr);
        println!("  x = {:.10} after {} iterations", solution.x, solution.iters);

        obs.show(
            ShowConfig::new()
                .title(format!("{equation} = 0  via  x = {}", candidate.expr))
                .legend(),
        )?;
        return Ok(());
    }

    eprintln!("No candidate converged from x0 = {x0}");
    std::process::exit(1);
}

/// Overlays the step error of every candidate.
///
/// Divergent candidates are cut short by a [`StallGuard`] so they do not
/// swamp the plot.
fn compare(equation: &str, candidates: &[Candidate], x0: f64) -> Result<(), Box<dyn Error>> {
    let names: Vec<&str> = candidates.iter().map(Candidate::label).collect();
    let mut errors: Vec<Vec<[f64; 2]>> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let g = Function::new(candidate.expr.clone(), VARIABLE);
        let mut points = Vec::new();
        let mut guard = StallGuard::new(10);

        let result = fixed_point::solve(&g, x0, &config(), |event: &Event<'_>| {
            #[allow(clippy::cast_precision_loss)]
            points.push([event.iter() as f64, event.error()]);
            fixpoint_core::Observer::observe(&mut guard, event)
        });

        match result {
            Ok(solution) => println!("{:<45} {:?}", candidate.label(), solution.status),
            Err(error) => println!("{:<45} {error}", candidate.label()),
        }
        errors.push(points);
    }

    // PlotObserver is sized at compile time, so draw the five templates.
    let mut obs = PlotObserver::<5>::new(std::array::from_fn(|i| {
        names.get(i).copied().unwrap_or("")
    }));
    for (slot, points) in errors.iter().enumerate() {
        for [iter, error] in points {
            let mut series = [None; 5];
            series[slot] = Some(*error);
            obs.record(*iter, series);
        }
    }

    obs.show(
        ShowConfig::new()
            .title(format!("Step error per candidate for {equation} = 0"))
            .legend()
            .log_y(),
    )?;
    Ok(())
}
