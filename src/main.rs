// Driving loop: advances the simulation frame by frame and writes each frame out
use std::path::PathBuf;
use clap::Parser;
use log::{info, error};
use spring_pendulum::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = APP_NAME, long_about = None)]
struct Args {
	/// Scenario file (YAML). Built-in defaults are used when omitted.
	#[arg(short, long)]
	config: Option<PathBuf>,
	/// Directory the frames are written to
	#[arg(short, long, default_value = "frames")]
	output_dir: PathBuf,
	/// Number of frames, overrides the scenario
	#[arg(short, long)]
	frames: Option<usize>,
	/// Only write every n-th frame
	#[arg(long, default_value_t = 1)]
	every: usize,
	/// Print state and energy for each frame instead of rendering images
	#[arg(long)]
	print: bool
}

fn load_config(args: &Args) -> Result<SimulationConfig, SimulationError> {
	let mut config = match &args.config {
		Some(path) => {
			info!("Loading scenario from {:?}", path);
			SimulationConfig::from_file(path)?
		},
		None => SimulationConfig::default()
	};
	if let Some(frames) = args.frames {
		config.stepping.frames = frames;
	}
	Ok(config)
}

fn debug_print(sim: &mut Simulation, config: &SimulationConfig) -> Result<(), SimulationError> {
	for i in 0..config.stepping.frames {
		let advance = sim.advance(config.stepping.dt, config.stepping.sub_steps)?;
		let e = sim.energy();
		println!("{}: t = {:.3}, pos = ({:.6}, {:.6}), vel = ({:.6}, {:.6}), KE = {:.6}, PE = {:.6}, E = {:.6}",
			i, sim.time(), advance.state.pos.x, advance.state.pos.y, advance.state.vel.x, advance.state.vel.y, e.kinetic, e.potential, e.total);
	}
	Ok(())
}

#[cfg(feature = "image-rendering")]
fn create_frames(sim: &mut Simulation, config: &SimulationConfig, args: &Args) -> Result<(), SimulationError> {
	// Use this command to generate video: $ ffmpeg -framerate 50 -i frame_%d.png -vcodec libx264 -pix_fmt yuv420p output.mp4
	std::fs::create_dir_all(&args.output_dir)?;
	let renderer = FrameRenderer::new(&config.display);
	let every = args.every.max(1);
	let mut written: usize = 0;
	for i in 0..config.stepping.frames {
		sim.advance(config.stepping.dt, config.stepping.sub_steps)?;
		if i % every != 0 {
			continue;
		}
		let image = renderer.render(sim)?;
		image.save(args.output_dir.join(format!("frame_{}.png", written)))?;
		written += 1;
	}
	info!("Wrote {} frames to {:?}", written, args.output_dir);
	Ok(())
}

#[cfg(not(feature = "image-rendering"))]
fn create_frames(sim: &mut Simulation, config: &SimulationConfig, _args: &Args) -> Result<(), SimulationError> {
	log::warn!("Built without the `image-rendering` feature, printing frames instead");
	debug_print(sim, config)
}

fn run(args: &Args) -> Result<(), SimulationError> {
	let config = load_config(args)?;
	let mut sim = Simulation::from_config(&config)?;
	info!(
		"Starting: {:?}, {} frames of {} x {} steps, initial energy {:.6}",
		sim.parameters(), config.stepping.frames, config.stepping.sub_steps, config.stepping.dt, sim.energy().total
	);
	match args.print {
		true => debug_print(&mut sim, &config)?,
		false => create_frames(&mut sim, &config, args)?
	}
	report(&sim)
}

fn report(sim: &Simulation) -> Result<(), SimulationError> {
	if let (Some(first), Some(last)) = (sim.history().iter().next(), sim.history().latest()) {
		info!("Energy drift over the recorded history: {:.3e}", last.total - first.total);
	}
	Ok(())
}

fn main() -> Result<(), SimulationError> {
	env_logger::Builder::from_default_env()
		.filter_level(log::LevelFilter::Info)
		.init();
	let args = Args::parse();
	run(&args).map_err(|e| {
		error!("{}", e);
		e
	})
}
