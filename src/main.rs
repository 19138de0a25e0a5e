use std::process::ExitCode;

use clap::Parser;
use log::error;

use pineda::config::Args;
use pineda::engine::Engine;
use pineda::model::Model;
use pineda::window::Window;

fn run(args: &Args) -> pineda::Result<()> {
    let model = Model::load(&args.mesh, args.texture.as_deref(), args.wrap, args.filter)?;
    let mut window = Window::new("Pineda", args.width, args.height)?;
    let mut engine = Engine::new(args.engine_config(), model);
    engine.run(&mut window)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
