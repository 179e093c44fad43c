//! Runs the probability lessons: prints each report, optionally writes the
//! numbers as JSON and the charts as SVG.
mod config;
mod plot;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::LessonsConfig;
use plot::Series;
use probsim::conditional::SimpsonTable;
use probsim::frequency::{convergence, CoinExperiment, Urn};
use probsim::geometry::{presets, NestedRegions};
use probsim::misc::linspace;
use probsim::prelude::*;
use probsim::sensitivity::{density_curves, moment_check};
use probsim::summary::{DiscreteSummary, SummaryTable};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lessons")]
#[command(version)]
#[command(about = "Probability lessons: experiments, reports and charts")]
struct Cli {
    /// Seed for the random number generator; random when absent
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// JSON file with lesson parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the numeric results to this JSON file
    #[arg(long, global = true)]
    json: Option<PathBuf>,

    /// Render SVG charts into this directory
    #[arg(long, global = true)]
    plot_dir: Option<PathBuf>,

    #[command(subcommand)]
    lesson: Lesson,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Lesson {
    /// Concentric circles in a square: geometric probability
    Target {
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Circle, triangle and incircle inside a square
    Inscribed {
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Running frequency of heads
    Coin {
        #[arg(long)]
        trials: Option<usize>,
    },
    /// Two balls from an urn: frequency against the classical value
    Urn {
        #[arg(long)]
        red: Option<u32>,
        #[arg(long)]
        blue: Option<u32>,
    },
    /// Simpson's paradox on a cohort table
    Simpson,
    /// PMF, mean, variance and mode of four discrete distributions
    Discrete,
    /// A continuous distribution from its density alone
    Custom {
        #[arg(long)]
        samples: Option<usize>,
    },
    /// How the log-normal distribution depends on σ
    Lognormal {
        #[arg(long)]
        samples: Option<usize>,
    },
    /// Every lesson in turn
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Target,
    Inscribed,
    Coin,
    Urn,
    Simpson,
    Discrete,
    Custom,
    Lognormal,
}

impl Topic {
    const ALL: [Topic; 8] = [
        Topic::Target,
        Topic::Inscribed,
        Topic::Coin,
        Topic::Urn,
        Topic::Simpson,
        Topic::Discrete,
        Topic::Custom,
        Topic::Lognormal,
    ];

    fn name(self) -> &'static str {
        match self {
            Topic::Target => "target",
            Topic::Inscribed => "inscribed",
            Topic::Coin => "coin",
            Topic::Urn => "urn",
            Topic::Simpson => "simpson",
            Topic::Discrete => "discrete",
            Topic::Custom => "custom",
            Topic::Lognormal => "lognormal",
        }
    }
}

impl Lesson {
    fn topics(&self) -> Vec<Topic> {
        match self {
            Lesson::Target { .. } => vec![Topic::Target],
            Lesson::Inscribed { .. } => vec![Topic::Inscribed],
            Lesson::Coin { .. } => vec![Topic::Coin],
            Lesson::Urn { .. } => vec![Topic::Urn],
            Lesson::Simpson => vec![Topic::Simpson],
            Lesson::Discrete => vec![Topic::Discrete],
            Lesson::Custom { .. } => vec![Topic::Custom],
            Lesson::Lognormal { .. } => vec![Topic::Lognormal],
            Lesson::All => Topic::ALL.to_vec(),
        }
    }

    /// Flags win over the config file
    fn apply(&self, config: &mut LessonsConfig) {
        match *self {
            Lesson::Target { samples: Some(n) } => config.target.samples = n,
            Lesson::Inscribed { samples: Some(n) } => {
                config.inscribed.samples = n
            }
            Lesson::Coin { trials: Some(n) } => config.coin.trials = n,
            Lesson::Urn { red, blue } => {
                if let Some(red) = red {
                    config.urn.red = red;
                }
                if let Some(blue) = blue {
                    config.urn.blue = blue;
                }
            }
            Lesson::Custom { samples: Some(n) } => config.custom.samples = n,
            Lesson::Lognormal { samples: Some(n) } => {
                config.lognormal.samples = n
            }
            _ => (),
        }
    }
}

struct Runner {
    config: LessonsConfig,
    rng: Xoshiro256Plus,
    plot_dir: Option<PathBuf>,
}

impl Runner {
    fn new(
        config: LessonsConfig,
        seed: u64,
        plot_dir: Option<PathBuf>,
    ) -> Self {
        Runner {
            config,
            rng: Xoshiro256Plus::seed_from_u64(seed),
            plot_dir,
        }
    }

    fn run(&mut self, topic: Topic) -> Result<Value> {
        tracing::info!(lesson = topic.name(), "running");
        match topic {
            Topic::Target => {
                let cfg = &self.config.target;
                let regions = presets::target(cfg.side, &cfg.radii)?;
                let sizes = (cfg.samples, cfg.scatter_points);
                self.regions(regions, sizes, "target.svg")
            }
            Topic::Inscribed => {
                let cfg = &self.config.inscribed;
                let regions = presets::inscribed(cfg.side)?;
                let sizes = (cfg.samples, cfg.scatter_points);
                self.regions(regions, sizes, "inscribed.svg")
            }
            Topic::Coin => self.coin(),
            Topic::Urn => self.urn(),
            Topic::Simpson => self.simpson(),
            Topic::Discrete => self.discrete(),
            Topic::Custom => self.custom(),
            Topic::Lognormal => self.lognormal(),
        }
    }

    fn plot_path(&self, name: &str) -> Result<Option<PathBuf>> {
        match &self.plot_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("creating plot directory {}", dir.display())
                })?;
                Ok(Some(dir.join(name)))
            }
            None => Ok(None),
        }
    }

    /// `sizes` is (samples, points shown in the scatter)
    fn regions(
        &mut self,
        regions: NestedRegions,
        sizes: (usize, usize),
        chart: &str,
    ) -> Result<Value> {
        let (samples, scatter) = sizes;
        let points = regions.square().sample_points(samples, &mut self.rng);
        let experiment = regions.observe(&points)?;
        println!("{}", experiment);
        println!("max |diff| = {:.6}", experiment.max_abs_diff());

        if let Some(path) = self.plot_path(chart)? {
            let shown = &points[..points.len().min(scatter)];
            let classes = regions.classify_all(shown);
            let square = regions.square();
            plot::regions(&path, square, shown, &classes, &experiment)?;
        }
        Ok(serde_json::to_value(&experiment)?)
    }

    fn coin(&mut self) -> Result<Value> {
        let cfg = &self.config.coin;
        let coin = Bernoulli::new(cfg.p)?;
        let experiment = CoinExperiment::new(coin, cfg.trials)?;
        let outcome = experiment.run(&mut self.rng);
        println!("{}", outcome);

        if let Some(path) = self.plot_path("coin.svg")? {
            let trials = outcome.running_frequency().len();
            let ns: Vec<f64> = (1..=trials).map(|n| n as f64).collect();
            let series = [Series {
                label: String::from("heads / tosses"),
                xs: &ns,
                ys: outcome.running_frequency(),
            }];
            plot::lines(
                &path,
                "relative frequency of heads",
                "tosses",
                "frequency",
                &series,
                Some(outcome.classical()),
            )?;

            let bars = [("heads", outcome.heads()), ("tails", outcome.tails())];
            let caption = format!("outcomes after {} tosses", trials);
            let counts = path.with_file_name("coin_counts.svg");
            plot::counts(&counts, &caption, &bars)?;
        }

        Ok(json!({
            "trials": outcome.heads() + outcome.tails(),
            "heads": outcome.heads(),
            "tails": outcome.tails(),
            "frequency": outcome.frequency(),
            "classical": outcome.classical(),
            "abs_diff": outcome.abs_diff(),
        }))
    }

    fn urn(&mut self) -> Result<Value> {
        let cfg = &self.config.urn;
        let urn = Urn::new(cfg.red, cfg.blue)?;
        let sweep = convergence(&urn, &cfg.sweep(), &mut self.rng)?;
        let classical = urn.classical_same_colour();

        println!("urn: {} red, {} blue", urn.red(), urn.blue());
        println!("classical P(same colour) = {:.4}", classical);
        if let Some(last) = sweep.last() {
            println!("frequency at N = {}: {:.4}", last.n, last.frequency);
            println!("|P* - P| = {:.6}", (last.frequency - classical).abs());
        }

        if let Some(path) = self.plot_path("urn.svg")? {
            let ns: Vec<f64> = sweep.iter().map(|p| p.n as f64).collect();
            let fs: Vec<f64> = sweep.iter().map(|p| p.frequency).collect();
            let series = [Series {
                label: String::from("same colour / experiments"),
                xs: &ns,
                ys: &fs,
            }];
            plot::lines(
                &path,
                "two balls without replacement",
                "experiments",
                "frequency",
                &series,
                Some(classical),
            )?;
        }

        Ok(json!({ "classical": classical, "sweep": sweep }))
    }

    fn simpson(&mut self) -> Result<Value> {
        let table = SimpsonTable::new(self.config.simpson.cohorts()?)?;
        println!("{}", table);

        if let Some(path) = self.plot_path("simpson.svg")? {
            plot::simpson(&path, &table)?;
        }

        Ok(json!({
            "cohorts": table.cohorts(),
            "aggregate": table.aggregate(),
            "overall_winner": table.overall_winner(),
            "reversal": table.reversal(),
        }))
    }

    fn discrete(&mut self) -> Result<Value> {
        let cfg = &self.config.discrete;
        let binomial = Binomial::new(cfg.binomial_n, cfg.binomial_p)?;
        let poisson = Poisson::new(cfg.poisson_rate)?;
        let geometric = Geometric::new(cfg.geometric_p)?;
        let hypergeometric =
            Hypergeometric::new(cfg.population, cfg.successes, cfg.draws)?;

        let table = SummaryTable(vec![
            DiscreteSummary::new("binomial", &binomial, cfg.binomial_max)?,
            DiscreteSummary::new("poisson", &poisson, cfg.poisson_max)?,
            DiscreteSummary::new("geometric", &geometric, cfg.geometric_max)?,
            DiscreteSummary::new(
                "hypergeometric",
                &hypergeometric,
                cfg.hypergeometric_max,
            )?,
        ]);
        println!("{}", table);

        if let Some(path) = self.plot_path("discrete.svg")? {
            plot::pmfs(&path, &table.0)?;
        }
        Ok(serde_json::to_value(&table)?)
    }

    fn custom(&mut self) -> Result<Value> {
        let cfg = &self.config.custom;
        let dist = NumericContinuous::new(Epanechnikov)?;
        let (a, b) = dist.bounds();

        let mean: f64 = dist.mean().context("mean")?;
        let variance: f64 = dist.variance().context("variance")?;
        let skewness = dist.skewness().context("skewness")?;
        let kurtosis = dist.kurtosis().context("kurtosis")?;
        let interval = dist.probability(cfg.interval_lo, cfg.interval_hi);
        let q80: f64 = dist.quantile(0.8);
        let q05: f64 = dist.quantile(0.05);

        println!("density: f(x) = 3/4 (1 - x^2) on [{}, {}]", a, b);
        println!("integral = {:.6}", dist.integral());
        println!(
            "P({} < X < {}) = {:.4}",
            cfg.interval_lo, cfg.interval_hi, interval
        );
        println!("E[X] = {:.4}", mean);
        println!("D[X] = {:.4}", variance);
        println!("sigma = {:.4}", variance.sqrt());
        println!("skewness = {:.4}", skewness);
        println!("excess kurtosis = {:.4}", kurtosis);
        println!("x(0.8) = {:.4}", q80);
        println!("5% point = {:.4}", q05);

        let samples: Vec<f64> = dist.sample(cfg.samples, &mut self.rng);
        if let Some(dir) = self.plot_path("custom_pdf.svg")? {
            let xs = linspace(cfg.plot_min, cfg.plot_max, cfg.grid_points);
            let pdf: Vec<f64> = xs.iter().map(|x| dist.pdf(x)).collect();
            let cdf: Vec<f64> = xs.iter().map(|x| dist.cdf(x)).collect();
            let bins = plot::density_bins(&samples, a, b, cfg.bins);

            let density = [Series {
                label: String::from("f(x)"),
                xs: &xs,
                ys: &pdf,
            }];
            let caption = "custom density";
            plot::histogram(&dir, caption, "f(x)", &samples, &bins, &density)?;

            let cumulative = [Series {
                label: String::from("F(x)"),
                xs: &xs,
                ys: &cdf,
            }];
            plot::histogram(
                &dir.with_file_name("custom_cdf.svg"),
                "custom distribution function",
                "F(x)",
                &samples,
                &plot::cumulative_bins(&bins),
                &cumulative,
            )?;
        }

        Ok(json!({
            "integral": dist.integral(),
            "interval": [cfg.interval_lo, cfg.interval_hi],
            "interval_probability": interval,
            "mean": mean,
            "variance": variance,
            "std": variance.sqrt(),
            "skewness": skewness,
            "kurtosis": kurtosis,
            "quantile_0_8": q80,
            "quantile_0_05": q05,
        }))
    }

    fn lognormal(&mut self) -> Result<Value> {
        let cfg = &self.config.lognormal;
        let xs = linspace(0.0, cfg.grid_max, cfg.grid_points);
        let curves = density_curves(cfg.mu, &cfg.sigmas, &xs)?;
        for curve in &curves {
            if let Some((x, f)) = curve.peak() {
                println!(
                    "sigma = {:<5} peak f({:.3}) = {:.4}",
                    curve.sigma, x, f
                );
            }
        }

        let check =
            moment_check(cfg.mu, cfg.check_sigma, cfg.samples, &mut self.rng)?;
        println!("{}", check);

        if let Some(path) = self.plot_path("lognormal_pdf.svg")? {
            let series: Vec<Series> = curves
                .iter()
                .map(|c| Series {
                    label: format!("sigma = {}", c.sigma),
                    xs: &c.xs,
                    ys: &c.pdf,
                })
                .collect();
            let caption = "log-normal density";
            plot::lines(&path, caption, "x", "f(x)", &series, None)?;

            let lognormal = LogNormal::new(cfg.mu, cfg.check_sigma)?;
            let pdf: Vec<f64> = xs.iter().map(|x| lognormal.pdf(x)).collect();
            let (top, bins) = (cfg.grid_max, cfg.bins);
            let bins = plot::density_bins(&check.samples, 0.0, top, bins);
            let theory = [Series {
                label: format!("sigma = {}", cfg.check_sigma),
                xs: &xs,
                ys: &pdf,
            }];
            plot::histogram(
                &path.with_file_name("lognormal_hist.svg"),
                "log-normal draws",
                "density",
                &check.samples,
                &bins,
                &theory,
            )?;
        }

        Ok(json!({
            "curves": curves,
            "moment_check": {
                "mu": check.mu,
                "sigma": check.sigma,
                "n": check.n,
                "theoretical_mean": check.theoretical_mean,
                "theoretical_variance": check.theoretical_variance,
                "empirical_mean": check.empirical_mean,
                "empirical_variance": check.empirical_variance,
            },
        }))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn write_json(
    path: &Path,
    seed: u64,
    results: serde_json::Map<String, Value>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let doc = json!({ "seed": seed, "lessons": results });
    std::fs::write(path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote results");
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => LessonsConfig::load(path)?,
        None => LessonsConfig::default(),
    };
    cli.lesson.apply(&mut config);

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(seed, "seeded; pass --seed to replay");

    let mut runner = Runner::new(config, seed, cli.plot_dir.clone());
    let mut results = serde_json::Map::new();
    for topic in cli.lesson.topics() {
        println!("== {} ==", topic.name());
        let value = runner
            .run(topic)
            .with_context(|| format!("lesson {}", topic.name()))?;
        results.insert(topic.name().to_owned(), value);
        println!();
    }

    match &cli.json {
        Some(path) => write_json(path, seed, results),
        None => Ok(()),
    }
}

fn main() -> Result<()> {
    init_tracing();
    run(Cli::parse())
}
