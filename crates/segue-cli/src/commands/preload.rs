use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc;

use segue_core::transition::HttpFetcher;
use segue_core::{AppConfig, Preloader, PreloaderEvent};

use super::open_page;

pub async fn run(config: Arc<AppConfig>, url: &str) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.http)?;
    let page = open_page(config, &fetcher, url).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let preloader = Preloader::new(&page.ctx, Some(tx));
    let started = Instant::now();

    preloader.start();
    let (_, total) = preloader.loaded();
    println!("Tracking {} assets", total);

    let completed = preloader.wait_completed();
    tokio::pin!(completed);
    loop {
        tokio::select! {
            Some(event) = rx.recv() => report(&event),
            _ = &mut completed => break,
        }
    }
    while let Ok(event) = rx.try_recv() {
        report(&event);
    }

    preloader.destroy();
    println!(
        "Preloader finished in {:.2}s ({} of {} assets loaded)",
        started.elapsed().as_secs_f64(),
        preloader.loaded().0,
        total
    );

    Ok(())
}

fn report(event: &PreloaderEvent) {
    match event {
        PreloaderEvent::Progress { loaded, total } => {
            let percent = *loaded as f64 / (*total).max(1) as f64 * 100.0;
            println!("  [{:>3.0}%] {}/{} assets", percent, loaded, total);
        }
        PreloaderEvent::Completed => println!("  Reveal complete"),
    }
}
