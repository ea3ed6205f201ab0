use std::path::PathBuf;

use anyhow::anyhow;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

use arcade_core::{ControlMode, Demo, Session};

use crate::arcade::{ArcadeRng, ArcadeSession, DrawList, PendingInput};
use crate::render::Layout;
use crate::webcam::ReferenceImages;

mod api;
mod arcade;
mod config;
mod render;
mod webcam;

#[derive(Parser, Resource)]
pub struct Options {
    #[arg(long, default_value = "pong")]
    pub demo: Demo,
    /// Defaults to face for pong and hand for blocks.
    #[arg(long)]
    pub control: Option<ControlMode>,
    #[arg(long, default_value = "127.0.0.1:8888")]
    pub api_bind: String,
    #[arg(long)]
    pub tick_rate: Option<f64>,
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub reference_a: Option<PathBuf>,
    #[arg(long)]
    pub reference_b: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let options = Options::parse();
    let config = config::load_config(options.config.as_deref(), options.tick_rate)?;
    let session = Session::new(options.demo, options.control, &config)?;
    let references = options.reference_a.is_some() && options.reference_b.is_some();
    if options.demo == Demo::Verify && !references {
        warn!("verification needs --reference-a and --reference-b");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let api_addr = options.api_bind.parse()?;
    let (api_state, api_resource) = api::ApiState::new();
    runtime.spawn(async move {
        info!("serving API on {}", api_addr);
        if let Err(err) = axum_server::bind(api_addr)
            .serve(api::new_api().with_state(api_state).into_make_service()).await {
            error!("failed to serve API: {}", err);
        }
    });

    let layout = Layout::new(&session);
    let window = layout.window_size();

    let mut app = App::new();
    app
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: format!("arcade: {}", options.demo),
                    resolution: WindowResolution::new(window.x, window.y),
                    resizable: false,
                    ..default()
                }),
                ..default()
            })
            .disable::<LogPlugin>())
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Time::<Fixed>::from_hz(config.tick_rate))
        .insert_resource(api_resource)
        .insert_resource(ArcadeSession(Some(session)))
        .insert_resource(ArcadeRng(StdRng::from_entropy()))
        .insert_resource(layout)
        .insert_resource(options)
        .init_resource::<PendingInput>()
        .init_resource::<DrawList>()
        .init_resource::<ReferenceImages>()
        .add_systems(Startup, (
            webcam::init_webcam,
            arcade::load_references,
            init,
        ))
        .add_systems(Update, (
            (
                api::update_api,
                arcade::read_keyboard,
                arcade::read_mouse,
                arcade::watch_references,
            ),
            (
                render::spawn_drawables,
                render::draw_gizmos,
            ),
        ).chain())
        .add_systems(FixedUpdate, arcade::tick_session);

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(anyhow!("exited with code {}", code)),
    }
}

fn init(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}
