use anyhow::Result;
use serde::Serialize;

use segue_core::motion::{ArcInterpolator, Pose};
use segue_core::AppConfig;

#[derive(Serialize)]
struct Sample {
    time: f64,
    taper: f64,
    pose: Pose,
}

pub fn run(config: &AppConfig, samples: usize, viewport: f64, json: bool) -> Result<()> {
    let arc = ArcInterpolator::new(config.preloader.arc.clone(), viewport)?;
    let steps = samples.max(1);

    let rows: Vec<Sample> = (0..=steps)
        .map(|i| {
            let time = i as f64 / steps as f64;
            Sample {
                time,
                taper: arc.taper(time),
                pose: arc.pose_at_time(time),
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:>6} {:>10} {:>10} {:>8} {:>8} {:>8}",
        "time", "y (px)", "z (px)", "scale", "rot", "taper"
    );
    for row in &rows {
        println!(
            "{:>6.3} {:>10.2} {:>10.2} {:>8.4} {:>8.2} {:>8.4}",
            row.time,
            row.pose.y_offset_px,
            row.pose.z_offset_px,
            row.pose.scale_x,
            row.pose.rotation_x_deg,
            row.taper
        );
    }

    Ok(())
}
