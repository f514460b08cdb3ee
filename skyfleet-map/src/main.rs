use macroquad::prelude::Conf;
use skyfleet_map_lib::settings::TrackerSettings;
use skyfleet_map_lib::{WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH, run};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn window_conf() -> Conf {
    Conf {
        window_title: WINDOW_TITLE.to_owned(),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let settings = match TrackerSettings::from_args_or_env(std::env::args()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Falling back to default settings: {:#}", e);
            TrackerSettings::default()
        }
    };
    info!(
        "Map centre {:.4}, {:.4} at zoom {}",
        settings.map_center.latitude, settings.map_center.longitude, settings.map_zoom
    );

    run(settings).await;
}
