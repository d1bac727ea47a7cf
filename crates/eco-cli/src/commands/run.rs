use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use eco_simulation::{
    AgentKind, PopulationCounts, PopulationTracker, SimConfig, SimEventKind, Simulation,
};

/// Lifecycle events shown without `--verbose`.
const NOTABLE_LIMIT: usize = 20;

pub fn run(
    config_path: Option<&Path>,
    ticks: u64,
    seed: Option<u64>,
    fps: Option<f64>,
    runs: u64,
    verbose: bool,
    json: bool,
) -> Result<(), String> {
    let mut config = super::load_config(config_path)?;
    if let Some(seed) = seed {
        config.seed = seed;
    }
    if let Some(fps) = fps {
        config.target_fps = fps;
    }
    if runs == 0 {
        return Err("--runs must be at least 1".into());
    }

    if runs > 1 {
        return compare(&config, ticks, runs, json);
    }

    let sim = simulate(config, ticks)?;
    if json {
        print_json(&sim, ticks)
    } else {
        print_report(&sim, ticks, verbose);
        Ok(())
    }
}

fn simulate(config: SimConfig, ticks: u64) -> Result<Simulation, String> {
    let mut sim = Simulation::with_default_systems(config)
        .map_err(|e| format!("invalid configuration: {e}"))?;
    sim.populate()
        .map_err(|e| format!("simulation init failed: {e}"))?;
    sim.run(ticks)
        .map_err(|e| format!("simulation error: {e}"))?;
    Ok(sim)
}

fn print_report(sim: &Simulation, ticks: u64, verbose: bool) {
    let config = sim.config();

    // Header
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!(
            "({ticks} ticks, seed={}, fps={})",
            config.seed, config.target_fps
        )
        .dimmed()
    );
    println!(
        "  {} agents alive, {} events logged",
        sim.population().total(),
        sim.events().len()
    );
    let dropped = sim.events().dropped();
    if dropped > 0 {
        println!("  {}", format!("({dropped} older events evicted)").dimmed());
    }
    println!("  Simulated time: {:.1}s", sim.clock().elapsed_secs());
    println!();

    // Events
    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for event in sim.events().events() {
            let tick_label = format!("[tick {:>4}]", event.tick).dimmed();
            let desc = colorize_event(&event.kind, &event.description);
            println!("  {tick_label} {desc}");
        }
        if sim.events().is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    } else {
        let notable: Vec<_> = sim.events().lifecycle().collect();

        if !notable.is_empty() {
            println!("  {}", "Notable Events".bold().underline());
            let skipped = notable.len().saturating_sub(NOTABLE_LIMIT);
            if skipped > 0 {
                println!("  {}", format!("... {skipped} earlier events").dimmed());
            }
            for event in &notable[skipped..] {
                let label = match event.kind {
                    SimEventKind::Removed { .. } => "EATEN".red().bold(),
                    SimEventKind::Divided { .. } => "BIRTH".green().bold(),
                    _ => "SPAWN".blue().bold(),
                };
                println!(
                    "  {} {label}  {}",
                    format!("[tick {:>4}]", event.tick).dimmed(),
                    event.description
                );
            }
            println!();
        }
    }

    // Population table
    println!("  {}", "Population".bold().underline());
    println!();

    let tracker = sim.get_system::<PopulationTracker>();
    let start = tracker
        .and_then(|t| t.history().next().copied())
        .unwrap_or_default();
    let peak = tracker.map(PopulationTracker::peak).unwrap_or_default();
    let now = sim.population();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Kind", "Start", "Now", "Peak", "Trend"]);
    for kind in AgentKind::ALL {
        let trend = tracker
            .map(|t| sparkline(&t.series(kind)))
            .unwrap_or_default();
        table.add_row(vec![
            colorize_kind(kind).to_string(),
            start.get(kind).to_string(),
            now.get(kind).to_string(),
            peak.get(kind).to_string(),
            trend,
        ]);
    }
    println!("{table}");
    println!();

    if verbose {
        println!("  {}", "Agents".bold().underline());
        println!();
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Name", "Kind", "Position", "Speed", "Colour"]);
        for agent in sim.world().live() {
            table.add_row(vec![
                agent.id.to_string(),
                agent.name.clone(),
                colorize_kind(agent.kind).to_string(),
                agent.position.to_string(),
                format!("{:.2}", agent.speed),
                agent.color.to_string(),
            ]);
        }
        println!("{table}");
        println!();
    }
}

fn print_json(sim: &Simulation, ticks: u64) -> Result<(), String> {
    let tracker = sim.get_system::<PopulationTracker>();
    let history: Vec<PopulationCounts> = tracker
        .map(|t| t.history().copied().collect())
        .unwrap_or_default();
    let agents: Vec<_> = sim.world().live().collect();

    let report = serde_json::json!({
        "ticks": ticks,
        "seed": sim.config().seed,
        "fps": sim.config().target_fps,
        "population": sim.population(),
        "peak": tracker.map(PopulationTracker::peak),
        "history": history,
        "events": sim.events().len(),
        "events_dropped": sim.events().dropped(),
        "agents": agents,
    });

    let text = serde_json::to_string_pretty(&report)
        .map_err(|e| format!("JSON serialization error: {e}"))?;
    println!("{text}");
    Ok(())
}

/// Run `runs` simulations with consecutive seeds and tabulate the outcome.
fn compare(config: &SimConfig, ticks: u64, runs: u64, json: bool) -> Result<(), String> {
    let mut rows = Vec::new();
    for i in 0..runs {
        let seed = config.seed.wrapping_add(i);
        let sim = simulate(config.clone().with_seed(seed), ticks)?;
        let peak = sim
            .get_system::<PopulationTracker>()
            .map(PopulationTracker::peak)
            .unwrap_or_default();
        rows.push((seed, sim.population(), peak));
    }

    if json {
        let report: Vec<_> = rows
            .iter()
            .map(|(seed, population, peak)| {
                serde_json::json!({ "seed": seed, "population": population, "peak": peak })
            })
            .collect();
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "  {} {}",
        "Comparison".bold(),
        format!("({runs} runs, {ticks} ticks each)").dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Seed",
        "Predators",
        "Herbivores",
        "Plants",
        "Peak herbivores",
    ]);
    for (seed, population, peak) in &rows {
        table.add_row(vec![
            seed.to_string(),
            population.predators.to_string(),
            population.herbivores.to_string(),
            population.plants.to_string(),
            peak.herbivores.to_string(),
        ]);
    }
    println!("{table}");
    println!();

    let extinct = rows.iter().filter(|(_, p, _)| p.herbivores == 0).count();
    if extinct > 0 {
        println!(
            "  {} herbivores died out in {extinct} of {runs} runs",
            "NOTE".yellow().bold()
        );
        println!();
    }

    Ok(())
}

fn colorize_kind(kind: AgentKind) -> colored::ColoredString {
    let label = kind.to_string();
    match kind {
        AgentKind::Predator => label.red(),
        AgentKind::Herbivore => label.blue(),
        AgentKind::Plant => label.green(),
    }
}

fn colorize_event(kind: &SimEventKind, description: &str) -> colored::ColoredString {
    match kind {
        SimEventKind::Removed { .. } => description.red().bold(),
        SimEventKind::Divided { .. } => description.green(),
        SimEventKind::Spawned { .. } => description.cyan(),
        SimEventKind::Replenished { .. } => description.blue(),
        SimEventKind::Collided { .. } => description.dimmed(),
        SimEventKind::Custom { .. } => description.normal(),
    }
}

/// Compress a count series into at most 24 block characters.
fn sparkline(series: &[usize]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    const WIDTH: usize = 24;

    if series.is_empty() {
        return String::new();
    }
    let max = series.iter().copied().max().unwrap_or(0).max(1);
    let chunk = series.len().div_ceil(WIDTH);
    series
        .chunks(chunk)
        .map(|c| {
            let v = c.iter().copied().max().unwrap_or(0);
            BARS[(v * (BARS.len() - 1)) / max]
        })
        .collect()
}
