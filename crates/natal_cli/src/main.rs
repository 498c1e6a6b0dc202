use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use natal_chart::{
    BaziInput, HouseFrame, deg_to_dms, element_balance, four_pillars, fusion_signature, sign_of,
};
use natal_compute::{
    BirthData, ComputeOrchestrator, ComputePolicy, JsonFileProfileStore, OrchestratorConfig,
    compute_profile,
};
use natal_core::{Body, Engine};
use natal_rs::{CacheConfig, Ephemeris, EphemerisConfig, Observer};
use natal_time::{JulianMoment, jd_to_date, resolve_local_time, sidereal_time};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "natal", about = "Natal profile engine CLI")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Julian Dates (UT and TT) of a UTC instant
    Jd {
        /// UTC datetime (YYYY-MM-DDThh:mm:ssZ)
        date: String,
    },
    /// UTC instant of a Julian Date (UT)
    Date {
        jd: f64,
    },
    /// Convert degrees to sign and DMS
    Sign {
        /// Tropical ecliptic longitude in degrees
        lon: f64,
    },
    /// Resolve a local civil time to UTC
    Resolve {
        /// Local date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Local time (hh:mm or hh:mm:ss)
        #[arg(long)]
        time: String,
        /// IANA time zone, e.g. Europe/Berlin
        #[arg(long)]
        zone: String,
        /// 0 = earlier, 1 = later occurrence of a repeated time
        #[arg(long)]
        fold: Option<u8>,
    },
    /// Apparent positions of all bodies
    Positions {
        /// UTC datetime (YYYY-MM-DDThh:mm:ssZ)
        #[arg(long)]
        date: String,
        /// Observer latitude for horizontal coordinates
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        /// Observer east longitude for horizontal coordinates
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Ascendant, Midheaven, Descendant and Imum Coeli
    Houses {
        /// UTC datetime (YYYY-MM-DDThh:mm:ssZ)
        #[arg(long)]
        date: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Four Pillars of a local birth time
    Bazi {
        #[arg(long)]
        date: String,
        /// Omit for an unknown birth time
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        zone: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        fold: Option<u8>,
    },
    /// Full natal profile as JSON
    Profile {
        #[arg(long)]
        date: String,
        /// Omit for an unknown birth time
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        zone: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long)]
        fold: Option<u8>,
    },
    /// Compute and persist a stored profile
    Compute {
        /// Subject id (file name stem in the store directory)
        subject: String,
        /// Directory of JSON profile files
        #[arg(long)]
        store: PathBuf,
        /// Recompute even if the inputs are unchanged
        #[arg(long)]
        force: bool,
        /// Allow positions outside their high-accuracy window (overrides NATAL_STRICT_MODE)
        #[arg(long)]
        lenient: bool,
        /// Persistence timeout in milliseconds
        #[arg(long, default_value = "5000")]
        timeout_ms: u64,
    },
}

fn die(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn parse_utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|n| n.and_utc())
        })
        .unwrap_or_else(|_| die(format!("expected YYYY-MM-DDThh:mm:ssZ, got {s}")))
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|e| die(format!("invalid date {s}: {e}")))
}

fn parse_time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .unwrap_or_else(|e| die(format!("invalid time {s}: {e}")))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => die(format!("failed to encode JSON: {e}")),
    }
}

fn ephemeris() -> Ephemeris {
    Ephemeris::new(EphemerisConfig::default()).unwrap_or_else(|e| die(format!("engine init: {e}")))
}

fn format_lon(lon: f64) -> String {
    let pos = sign_of(lon);
    format!(
        "{:>9.4}°  {:>2}°{:02}'{:04.1}\" {}",
        lon,
        pos.dms.degrees,
        pos.dms.minutes,
        pos.dms.seconds,
        pos.sign.name()
    )
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Jd { date } => {
            let moment = JulianMoment::from_utc(&parse_utc(&date));
            if cli.json {
                print_json(&moment);
            } else {
                println!("JD (UT): {:.6}", moment.jd_ut);
                println!("JD (TT): {:.6}", moment.jd_tt);
                println!("ΔT:      {:.2} s", moment.delta_t_s);
            }
        }

        Commands::Date { jd } => {
            let date = jd_to_date(jd).unwrap_or_else(|e| die(e));
            println!("{}", date.to_rfc3339());
        }

        Commands::Sign { lon } => {
            let pos = sign_of(lon);
            if cli.json {
                print_json(&pos);
            } else {
                let dms = deg_to_dms(pos.degree_in_sign);
                println!(
                    "{} - {} deg {} min {:.1} sec ({:.4} deg in sign, {})",
                    pos.sign.name(),
                    dms.degrees,
                    dms.minutes,
                    dms.seconds,
                    pos.degree_in_sign,
                    pos.sign.element().name()
                );
            }
        }

        Commands::Resolve {
            date,
            time,
            zone,
            fold,
        } => {
            let resolved = resolve_local_time(parse_date(&date), parse_time(&time), &zone, fold)
                .unwrap_or_else(|e| die(format!("{}: {e}", e.code())));
            if cli.json {
                print_json(&resolved);
            } else {
                println!(
                    "{} (UTC{:+} min{})",
                    resolved.utc.to_rfc3339(),
                    resolved.utc_offset_minutes,
                    if resolved.dst { ", DST" } else { "" }
                );
            }
        }

        Commands::Positions { date, lat, lon } => {
            let instant = parse_utc(&date);
            let eph = ephemeris();
            let observer = lat.zip(lon).map(|(la, lo)| Observer::new(la, lo));
            let state = eph
                .solar_system_state(instant, observer)
                .await
                .unwrap_or_else(|e| die(e));
            if cli.json {
                print_json(&state);
            } else {
                let mut all = vec![state.sun, state.moon.position];
                all.extend(state.planets.iter().copied());
                for p in &all {
                    println!(
                        "{:<8} {}  β {:>8.4}°  {:>12.6} AU{}",
                        p.body.name(),
                        format_lon(p.lon_deg),
                        p.lat_deg,
                        p.distance_au,
                        if p.confidence == natal_core::Confidence::Reduced {
                            "  (reduced)"
                        } else {
                            ""
                        }
                    );
                }
                println!(
                    "Moon phase: {:?} ({:.1}% illuminated)",
                    state.moon.phase.name,
                    state.moon.phase.illumination * 100.0
                );
                if let Some(sky) = &state.sky {
                    for s in sky {
                        println!(
                            "{:<8} alt {:>7.3}°  az {:>7.3}°",
                            s.body.name(),
                            s.horizontal.alt_deg,
                            s.horizontal.az_deg
                        );
                    }
                }
            }
        }

        Commands::Houses { date, lat, lon } => {
            let moment = JulianMoment::from_utc(&parse_utc(&date));
            let frame = HouseFrame::for_moment(&moment, lat, lon).unwrap_or_else(|e| die(e));
            if cli.json {
                print_json(&frame);
            } else {
                let st = sidereal_time(moment.jd_ut, lon);
                println!("LST: {:.6}°  ε: {:.6}°", st.lst_deg, frame.obliquity_deg);
                for (name, angle) in [
                    ("ASC", &frame.ascendant),
                    ("MC", &frame.midheaven),
                    ("DSC", &frame.descendant),
                    ("IC", &frame.imum_coeli),
                ] {
                    println!(
                        "{name:<4} {}{}",
                        format_lon(angle.lon_deg),
                        if angle.sign_sensitive {
                            "  (within 1 min of a sign change)"
                        } else {
                            ""
                        }
                    );
                }
            }
        }

        Commands::Bazi {
            date,
            time,
            zone,
            lon,
            fold,
        } => {
            let hour_known = time.is_some();
            let local_time = time
                .as_deref()
                .map(parse_time)
                .unwrap_or(NaiveTime::MIN + chrono::TimeDelta::hours(12));
            let resolved = resolve_local_time(parse_date(&date), local_time, &zone, fold)
                .unwrap_or_else(|e| die(format!("{}: {e}", e.code())));
            let sun = Engine::default()
                .position(Body::Sun, &JulianMoment::from_utc(&resolved.utc))
                .unwrap_or_else(|e| die(e));
            let pillars = four_pillars(&BaziInput {
                local_date: resolved.local.date(),
                utc: resolved.utc,
                longitude_deg: lon,
                sun_longitude_deg: sun.lon_deg,
                hour_known,
            })
            .unwrap_or_else(|e| die(e));
            if cli.json {
                print_json(&pillars);
            } else {
                println!("{}", pillars.notation);
                for (name, p) in [
                    ("Year", Some(&pillars.year)),
                    ("Month", Some(&pillars.month)),
                    ("Day", Some(&pillars.day)),
                    ("Hour", pillars.hour.as_ref()),
                ] {
                    match p {
                        Some(p) => println!(
                            "{name:<6} {}-{} ({} {}, {})",
                            p.stem.name(),
                            p.branch.name(),
                            p.stem_polarity.name(),
                            p.stem_element.name(),
                            p.animal
                        ),
                        None => println!("{name:<6} unknown"),
                    }
                }
                let b = element_balance(&pillars);
                println!(
                    "Wood {:.1}%  Fire {:.1}%  Earth {:.1}%  Metal {:.1}%  Water {:.1}%",
                    b.wood, b.fire, b.earth, b.metal, b.water
                );
                let fusion =
                    fusion_signature(pillars.day_master_element(), sign_of(sun.lon_deg).sign);
                println!("{}", fusion.description);
            }
        }

        Commands::Profile {
            date,
            time,
            zone,
            lat,
            lon,
            fold,
        } => {
            let birth = BirthData {
                date: parse_date(&date),
                time: time.as_deref().map(parse_time),
                zone,
                fold,
                latitude_deg: lat,
                longitude_deg: lon,
            };
            let profile = compute_profile(&ephemeris(), &birth)
                .await
                .unwrap_or_else(|e| die(e));
            print_json(&profile);
        }

        Commands::Compute {
            subject,
            store,
            force,
            lenient,
            timeout_ms,
        } => {
            let mut policy = ComputePolicy::from_env(force);
            if lenient {
                policy.strict_mode = false;
            }
            tracing::debug!(
                %subject,
                strict = policy.strict_mode,
                force,
                "computing stored profile"
            );
            // One-shot process: the cache would never be reused.
            let eph = Ephemeris::new(EphemerisConfig {
                cache: CacheConfig::disabled(),
                ..EphemerisConfig::default()
            })
            .unwrap_or_else(|e| die(format!("engine init: {e}")));
            let orchestrator = ComputeOrchestrator::new(
                Arc::new(JsonFileProfileStore::new(store)),
                Arc::new(eph),
                OrchestratorConfig {
                    persistence_timeout: Duration::from_millis(timeout_ms),
                },
            )
            .unwrap_or_else(|e| die(e));
            let outcome = orchestrator
                .compute(&subject, policy)
                .await
                .unwrap_or_else(|e| die(e));
            print_json(&outcome);
            if !outcome.is_ok() {
                std::process::exit(2);
            }
        }
    }
}
