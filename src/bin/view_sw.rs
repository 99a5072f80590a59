use anyhow::{Context, bail};
use clap::Parser;
use log::{LevelFilter, info};
use minifb::{Key, Scale, Window, WindowOptions};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use bspdoom::{
    renderer::{RendererExt, Screen, Software},
    sim::{InputCmd, Player, TIC_RATE, TicRunner},
    wad::{Wad, load_level},
    world::TextureBank,
};

/// Walk a Doom map with the span-clipping software renderer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// IWAD to load
    wad: PathBuf,

    /// Map marker, e.g. E1M1 or MAP01
    #[arg(long, default_value = "E1M1")]
    map: String,

    #[arg(long, default_value_t = 320)]
    width: usize,

    #[arg(long, default_value_t = 200)]
    height: usize,

    /// Window pixel multiplier: 1, 2, 4 or 8
    #[arg(long, default_value_t = 4)]
    scale: u8,

    /// More output per repeat (warn, info, debug, trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn window_scale(scale: u8) -> anyhow::Result<Scale> {
    Ok(match scale {
        1 => Scale::X1,
        2 => Scale::X2,
        4 => Scale::X4,
        8 => Scale::X8,
        n => bail!("unsupported scale {n} (use 1, 2, 4 or 8)"),
    })
}

/// Sample the keyboard into one tic's worth of intent.
fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();

    if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
        cmd.forward -= 1.0;
    }

    let alt = win.is_key_down(Key::LeftAlt) || win.is_key_down(Key::RightAlt);
    if alt {
        // Alt + ←/→ strafes
        if win.is_key_down(Key::Left) {
            cmd.strafe -= 1.0;
        }
        if win.is_key_down(Key::Right) {
            cmd.strafe += 1.0;
        }
    } else {
        if win.is_key_down(Key::Left) {
            cmd.turn += 1.0;
        }
        if win.is_key_down(Key::Right) {
            cmd.turn -= 1.0;
        }
    }

    if win.is_key_down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1.0;
    }

    cmd.run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
    cmd
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    TermLogger::init(
        level_filter(args.verbose),
        ConfigBuilder::default()
            .set_time_level(LevelFilter::Trace)
            .build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let screen = Screen::new(args.width, args.height)?;
    let scale = window_scale(args.scale)?;

    let wad = Wad::from_file(&args.wad)
        .with_context(|| format!("reading {}", args.wad.display()))?;
    let marker = wad
        .level_index(&args.map)
        .with_context(|| format!("map {} not found in {}", args.map, args.wad.display()))?;

    let mut bank = TextureBank::new();
    let mut level = load_level(&wad, marker, &mut bank)
        .with_context(|| format!("loading {}", args.map))?;

    let player = Player::spawn(&level).context("map has no Player 1 start")?;
    let mut sim = TicRunner::new(player);

    let mut win = Window::new(
        &format!("bspdoom: {}", level.name),
        screen.width,
        screen.height,
        WindowOptions {
            scale,
            ..WindowOptions::default()
        },
    )
    .context("opening window")?;
    win.set_target_fps(TIC_RATE as usize);

    let mut renderer = Software::new();

    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let cmd = read_input(&win);
        sim.pump(&mut level, &cmd);

        let t0 = Instant::now();
        let camera = sim.player().camera();
        let mut presented = Ok(());
        renderer.draw_frame(screen, &level, &camera, &bank, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            presented = win.update_with_buffer(fb, w, h);
        });
        presented.context("presenting frame")?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg render: {avg_ms:.2} ms ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
