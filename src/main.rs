// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![forbid(unsafe_code)]

use anyhow::{self as ah, Context as _, format_err as err};
use clap::Parser;
use std::{
    fmt::Display,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};
use tecsense::{
    Channel, Estimator, EstimatorConfig, SampleSource, Volts,
    sim::SimAdc,
    temp::{ADC_UREF, NUM_SAMPLES, OUTLIER_THRESHOLD},
};

#[derive(Parser, Debug)]
#[command(about = "Poll the thermistor temperature")]
struct Opts {
    /// SPI bus number.
    #[arg(long, default_value_t = 5)]
    spi_bus: u8,

    /// SPI slave select of the bus.
    #[arg(long, default_value_t = 0)]
    slave_select: u8,

    /// SPI clock frequency.
    #[arg(long, default_value_t = 500_000)]
    clock_hz: u32,

    /// BCM GPIO number of the ADC chip select.
    #[arg(long, default_value_t = 12)]
    cs_pin: u8,

    /// ADC channel of the thermistor.
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(0..=7))]
    channel: u8,

    /// Number of samples per reading.
    #[arg(long, default_value_t = NUM_SAMPLES)]
    samples: usize,

    /// Outlier rejection threshold in standard deviations.
    #[arg(long, default_value_t = OUTLIER_THRESHOLD)]
    threshold: f64,

    /// ADC reference and divider supply voltage.
    #[arg(long, default_value_t = ADC_UREF.get())]
    supply: f64,

    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Stop after this many readings. 0 polls forever.
    #[arg(long, default_value_t = 0)]
    count: u64,

    /// Do not access hardware. Simulate a thermistor voltage instead.
    #[arg(long, value_name = "VOLTS")]
    simulate: Option<f64>,

    /// Simulated dropout to zero every N samples. 0 disables dropouts.
    #[arg(long, default_value_t = 37)]
    sim_glitch: usize,

    /// Print mean code, voltage and outlier count with every reading.
    #[arg(short, long)]
    verbose: bool,
}

impl Opts {
    fn estimator_config(&self) -> ah::Result<EstimatorConfig> {
        if self.samples == 0 {
            return Err(err!("The number of samples must be at least 1."));
        }
        if !(self.threshold > 0.0) {
            return Err(err!("The outlier threshold must be positive."));
        }
        if !(self.supply > 0.0) {
            return Err(err!("The supply voltage must be positive."));
        }
        Ok(EstimatorConfig {
            channel: Channel::new(self.channel)
                .ok_or_else(|| err!("Invalid ADC channel {}", self.channel))?,
            num_samples: self.samples,
            outlier_threshold: self.threshold,
            supply: Volts::new(self.supply),
        })
    }

    #[cfg(feature = "rpi")]
    fn bus_config(&self) -> tecsense::hw::BusConfig {
        tecsense::hw::BusConfig {
            bus: self.spi_bus,
            slave_select: self.slave_select,
            clock_hz: self.clock_hz,
            cs_pin: self.cs_pin,
        }
    }
}

/// Set from the SIGINT/SIGTERM handler.
/// The poll loop returns then, so that the ADC gets dropped and released.
static STOP: AtomicBool = AtomicBool::new(false);

const SLEEP_SLICE: Duration = Duration::from_millis(50);

fn sleep_unless_stopped(interval: Duration, stop: &AtomicBool) {
    let mut left = interval;
    while !left.is_zero() && !stop.load(Ordering::Relaxed) {
        let slice = left.min(SLEEP_SLICE);
        thread::sleep(slice);
        left -= slice;
    }
}

/// Print one reading per interval until `stop` is set or `--count` is reached.
/// Returns the number of cycles run.
fn poll<S>(opts: &Opts, est: &Estimator, source: &mut S, stop: &AtomicBool) -> u64
where
    S: SampleSource,
    S::Error: Display,
{
    let interval = Duration::from_millis(opts.interval_ms);
    let mut n = 0_u64;
    while !stop.load(Ordering::Relaxed) {
        match est.read_temperature(source) {
            Ok(r) => {
                println!("Estimated Temperature: {}°C", r.celsius);
                if opts.verbose {
                    println!(
                        "    mean code {:.1}, {}, {} samples kept, {} rejected{}{}",
                        r.filtered.mean,
                        r.volts,
                        r.filtered.kept,
                        r.filtered.rejected,
                        if r.filtered.fallback { ", unfiltered" } else { "" },
                        if r.is_at_range_limit() { ", out of calibrated range" } else { "" },
                    );
                }
            }
            Err(e) => {
                log::error!("Temperature reading failed: {e}");
            }
        }

        n += 1;
        if opts.count != 0 && n >= opts.count {
            break;
        }
        sleep_unless_stopped(interval, stop);
    }
    n
}

fn main() -> ah::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();
    let est = Estimator::new(opts.estimator_config()?);

    ctrlc::set_handler(|| STOP.store(true, Ordering::Relaxed))
        .context("Install signal handler")?;

    if let Some(volts) = opts.simulate {
        log::info!("Simulating {volts} V thermistor voltage.");
        let mut sim =
            SimAdc::new(Volts::new(volts), est.config().supply).with_glitches(opts.sim_glitch);
        poll(&opts, &est, &mut sim, &STOP);
        return Ok(());
    }

    run_hardware(&opts, &est)
}

#[cfg(feature = "rpi")]
fn run_hardware(opts: &Opts, est: &Estimator) -> ah::Result<()> {
    let mut adc = tecsense::hw::open(&opts.bus_config())?;
    adc.configure(est.config().channel)
        .context("Configure ADC")?;
    poll(opts, est, &mut adc, &STOP);
    log::info!("Stopped. Releasing ADC.");
    Ok(())
}

#[cfg(not(feature = "rpi"))]
fn run_hardware(_opts: &Opts, _est: &Estimator) -> ah::Result<()> {
    Err(err!(
        "Built without Raspberry Pi support. Use --simulate to run without hardware."
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use core::convert::Infallible;
    use std::time::Instant;

    /// Simulated ADC that raises the stop flag after a number of samples,
    /// like a signal arriving in the middle of a cycle.
    struct StopAfter<'a> {
        sim: SimAdc,
        left: usize,
        stop: &'a AtomicBool,
    }

    impl SampleSource for StopAfter<'_> {
        type Error = Infallible;

        fn sample(&mut self, chan: Channel) -> Result<u16, Infallible> {
            self.left = self.left.saturating_sub(1);
            if self.left == 0 {
                self.stop.store(true, Ordering::Relaxed);
            }
            self.sim.sample(chan)
        }
    }

    fn opts(args: &[&str]) -> Opts {
        let mut argv = vec!["tecsense", "--simulate", "0.75", "--interval-ms", "0"];
        argv.extend_from_slice(args);
        Opts::parse_from(argv)
    }

    fn sim() -> SimAdc {
        SimAdc::new(Volts::new(0.75), ADC_UREF)
    }

    #[test]
    fn test_stop_before_start() {
        let opts = opts(&[]);
        let est = Estimator::new(opts.estimator_config().unwrap());
        let stop = AtomicBool::new(true);
        assert_eq!(poll(&opts, &est, &mut sim(), &stop), 0);
    }

    #[test]
    fn test_stop_ends_endless_loop() {
        let opts = opts(&[]);
        assert_eq!(opts.count, 0);
        let est = Estimator::new(opts.estimator_config().unwrap());
        let stop = AtomicBool::new(false);
        let mut src = StopAfter {
            sim: sim(),
            left: 150,
            stop: &stop,
        };
        // The cycle that sees the flag still completes, then the loop returns.
        assert_eq!(poll(&opts, &est, &mut src, &stop), 2);
        assert!(stop.load(Ordering::Relaxed));
    }

    #[test]
    fn test_count() {
        let opts = opts(&["--count", "3"]);
        let est = Estimator::new(opts.estimator_config().unwrap());
        let stop = AtomicBool::new(false);
        assert_eq!(poll(&opts, &est, &mut sim(), &stop), 3);
    }

    #[test]
    fn test_sleep_interrupted() {
        let stop = AtomicBool::new(true);
        let start = Instant::now();
        sleep_unless_stopped(Duration::from_secs(10), &stop);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_config_validation() {
        assert!(opts(&["--samples", "0"]).estimator_config().is_err());
        assert!(opts(&["--threshold", "0"]).estimator_config().is_err());
        assert!(opts(&["--supply", "0"]).estimator_config().is_err());
        let conf = opts(&["--supply", "3.3"]).estimator_config().unwrap();
        assert_eq!(conf.supply, Volts::new(3.3));
    }
}

// vim: ts=4 sw=4 expandtab
