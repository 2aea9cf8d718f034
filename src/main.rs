#[cfg(not(target_arch = "wasm32"))]
mod desktop {
    use std::{path::PathBuf, time::Duration};

    use clap::{builder::ValueParser, value_parser, Arg, ArgMatches, Command};
    use log::{info, warn};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use starfield_backdrop::{
        report::{self, Strategy},
        scheduler::{frame_period, DesktopFrameLoop, HeadlessSurface, SurfaceEvent},
        RenderError, StarfieldApp, StarfieldConfig, TickScheduler, Viewport,
    };
    use url::Url;

    fn parse_fps(value: &str) -> Result<f64, String> {
        let fps = value.parse::<f64>().map_err(|e| e.to_string())?;
        frame_period(fps).map_err(|e| e.to_string())?;
        Ok(fps)
    }

    fn cli() -> Command {
        Command::new("starfield-backdrop")
            .about("Animated starfield backdrop and PageSpeed report helpers")
            .subcommand_required(true)
            .subcommand(
                Command::new("render")
                    .about("Run the backdrop headless and save the last frame as PNG")
                    .arg(Arg::new("width").long("width").default_value("800").value_parser(value_parser!(u32)))
                    .arg(Arg::new("height").long("height").default_value("600").value_parser(value_parser!(u32)))
                    .arg(Arg::new("frames").long("frames").default_value("120").value_parser(value_parser!(u64)))
                    .arg(Arg::new("fps").long("fps").default_value("60").value_parser(ValueParser::new(parse_fps)))
                    .arg(Arg::new("seed").long("seed").value_parser(value_parser!(u64)))
                    .arg(Arg::new("config").long("config").value_parser(value_parser!(PathBuf)))
                    .arg(
                        Arg::new("resize")
                            .long("resize")
                            .help("Resize the surface to WIDTHxHEIGHT while running")
                            .value_parser(ValueParser::new(|s: &str| s.parse::<Viewport>())),
                    )
                    .arg(
                        Arg::new("resize-after")
                            .long("resize-after")
                            .help("Milliseconds before the resize is applied")
                            .default_value("500")
                            .value_parser(value_parser!(u64)),
                    )
                    .arg(
                        Arg::new("output")
                            .long("output")
                            .short('o')
                            .default_value("starfield.png")
                            .value_parser(value_parser!(PathBuf)),
                    ),
            )
            .subcommand(
                Command::new("request")
                    .about("Print the PageSpeed request URL for a site")
                    .arg(Arg::new("url").long("url").required(true))
                    .arg(
                        Arg::new("strategy")
                            .long("strategy")
                            .default_value("mobile")
                            .help("mobile or desktop")
                            .value_parser(ValueParser::new(|s: &str| s.parse::<Strategy>())),
                    )
                    .arg(Arg::new("key").long("key"))
                    .arg(Arg::new("endpoint").long("endpoint").default_value(report::DEFAULT_ENDPOINT)),
            )
            .subcommand(
                Command::new("summarize")
                    .about("Summarize a saved PageSpeed JSON response")
                    .arg(Arg::new("path").required(true).value_parser(value_parser!(PathBuf))),
            )
    }

    async fn render(args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
        let config = match args.get_one::<PathBuf>("config") {
            Some(path) => StarfieldConfig::load(path).map_err(RenderError::from)?,
            None => StarfieldConfig::default(),
        };
        let width = *args.get_one::<u32>("width").unwrap_or(&800);
        let height = *args.get_one::<u32>("height").unwrap_or(&600);
        let frames = *args.get_one::<u64>("frames").unwrap_or(&120);
        let fps = *args.get_one::<f64>("fps").unwrap_or(&60.);
        let rng = match args.get_one::<u64>("seed") {
            Some(seed) => ChaCha8Rng::seed_from_u64(*seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let surface = HeadlessSurface {
            viewport: Viewport::new(width as f64, height as f64),
        };
        let Some(app) = StarfieldApp::mount(&surface, config, rng, TickScheduler::default()) else {
            return Ok(());
        };

        let mut frame_loop = DesktopFrameLoop::spawn(app, fps, Some(frames))?;

        if let Some(viewport) = args.get_one::<Viewport>("resize").copied() {
            let delay = Duration::from_millis(*args.get_one::<u64>("resize-after").unwrap_or(&500));
            let events = frame_loop.events();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = events.send(SurfaceEvent::Resized(viewport));
            });
        }

        let finished = tokio::select! {
            app = frame_loop.join() => Some(app),
            _ = tokio::signal::ctrl_c() => None,
        };
        let app = match finished {
            Some(app) => app?,
            None => {
                warn!("Interrupted, tearing the starfield down");
                frame_loop.finish().await?
            }
        };

        let output = args
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from("starfield.png"));
        app.canvas().save_png(&output)?;
        info!("Wrote frame {} to {}", app.frames(), output.display());
        Ok(())
    }

    fn request(args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
        let input = args.get_one::<String>("url").map(String::as_str).unwrap_or_default();
        let strategy = args.get_one::<Strategy>("strategy").copied().unwrap_or_default();
        let endpoint = Url::parse(
            args.get_one::<String>("endpoint")
                .map(String::as_str)
                .unwrap_or(report::DEFAULT_ENDPOINT),
        )?;
        let target = report::normalize_target(input)?;
        let key = args.get_one::<String>("key").map(String::as_str);

        println!("{}", report::request_url(&endpoint, &target, strategy, key));
        Ok(())
    }

    fn summarize(args: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
        let path = args.get_one::<PathBuf>("path").ok_or("missing report path")?;
        let body = std::fs::read_to_string(path)?;
        let report = report::decode_response(200, &body)?;
        print!("{}", report.summary());
        Ok(())
    }

    pub fn main() -> Result<(), Box<dyn std::error::Error>> {
        starfield_backdrop::init_logging();
        let matches = cli().get_matches();

        let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

        rt.block_on(async {
            match matches.subcommand() {
                Some(("render", args)) => render(args).await,
                Some(("request", args)) => request(args),
                Some(("summarize", args)) => summarize(args),
                _ => Ok(()),
            }
        })
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn cli_definition_is_consistent() {
            cli().debug_assert();
        }

        #[test]
        fn parses_render_flags() {
            let matches = cli()
                .try_get_matches_from(["starfield-backdrop", "render", "--resize", "1200x900", "--frames", "3"])
                .unwrap();
            let (_, args) = matches.subcommand().unwrap();
            assert_eq!(args.get_one::<Viewport>("resize"), Some(&Viewport::new(1200., 900.)));
            assert_eq!(args.get_one::<u64>("frames"), Some(&3));
        }

        #[test]
        fn rejects_unusable_fps() {
            for fps in ["inf", "NaN", "0", "-5", "fast"] {
                assert!(cli()
                    .try_get_matches_from(["starfield-backdrop", "render", "--fps", fps])
                    .is_err());
            }
            let matches = cli()
                .try_get_matches_from(["starfield-backdrop", "render", "--fps", "1e10"])
                .unwrap();
            let (_, args) = matches.subcommand().unwrap();
            assert_eq!(args.get_one::<f64>("fps"), Some(&1e10));
        }

        #[test]
        fn rejects_unknown_strategy() {
            assert!(cli()
                .try_get_matches_from(["starfield-backdrop", "request", "--url", "a.com", "--strategy", "tablet"])
                .is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    desktop::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
