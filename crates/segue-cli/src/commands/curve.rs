use anyhow::{bail, Result};

use segue_core::motion::easing::sampled_peak;
use segue_core::motion::{solve_overshoot_for_peak, Ease};

pub fn run(min: f64, max: f64, peak: f64) -> Result<()> {
    if max < min {
        bail!("--max ({}) must not be below --min ({})", max, min);
    }

    let ease = solve_overshoot_for_peak(min, max, peak);
    let Ease::BackOut { overshoot } = ease else {
        bail!("solver returned {:?}", ease);
    };

    let span = max - min;
    let normalized = if span > 0.0 {
        (peak.clamp(min, max) - min) / span
    } else {
        0.0
    };

    println!("Overshoot:       {:.5}", overshoot);
    println!("Target maximum:  {:.5}", 1.0 + normalized);
    println!("Sampled maximum: {:.5}", sampled_peak(|t| ease.apply(t)));
    println!("\nAs config: ease_scale = {{ back_out = {{ overshoot = {:.5} }} }}", overshoot);

    Ok(())
}
