use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use segue_core::page::PageRegistry;
use segue_core::scroll::SmoothScroll;
use segue_core::transition::{HttpFetcher, SessionHistory};
use segue_core::{AppConfig, NavigationOutcome, Preloader, TransitionController, TransitionEvent};

use super::open_page;

pub async fn run(config: Arc<AppConfig>, url: &str, paths: &[String], glide: Option<f64>) -> Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
    let page = open_page(config.clone(), &fetcher, url).await?;

    let history = Arc::new(SessionHistory::new(page.url.clone()));
    let scroll = Arc::new(SmoothScroll::new(&config.scroll));
    let registry = PageRegistry::with_defaults(&page.ctx);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let controller = TransitionController::new(
        page.ctx.clone(),
        registry,
        fetcher,
        history.clone(),
        scroll.clone(),
    )
    .with_event_sender(tx);

    // Display refresh: the controller gets a tick every frame for the whole visit
    let frame = page.ctx.frame_driver().frame_duration();
    let frames = async {
        let epoch = Instant::now();
        let mut interval = tokio::time::interval(frame);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            controller.tick(epoch.elapsed().as_secs_f64() * 1000.0);
        }
    };

    let session = async {
        println!("Booting {}", page.url);
        let preloader = Preloader::new(&page.ctx, None);
        controller.boot(&preloader).await;
        print_events(&mut rx);
        println!("{} links handled in-app", controller.links().bound().len());
        if let Some(y) = glide {
            glide_to(&scroll, y, frame).await;
        }

        for path in paths {
            println!("\nNavigating to {}", path);
            let outcome = controller.navigate_to(path).await?;
            print_events(&mut rx);

            match outcome {
                NavigationOutcome::Completed { template } => {
                    println!("Now on {} ({})", controller.location(), template);
                }
                NavigationOutcome::Unchanged => println!("Already there"),
                NavigationOutcome::Queued => println!("Queued behind a running transition"),
                NavigationOutcome::Failed { reason } => println!("Failed: {}", reason),
            }
            if let Some(y) = glide {
                glide_to(&scroll, y, frame).await;
            }
        }
        anyhow::Ok(())
    };

    tokio::select! {
        result = session => result?,
        _ = frames => {}
    }

    println!("\nHistory ({} entries):", history.len());
    for entry in history.entries() {
        println!("  {}", entry);
    }

    Ok(())
}

/// Start a glide and wait for the frame loop to finish it
async fn glide_to(scroll: &SmoothScroll, y: f64, frame: std::time::Duration) {
    scroll.glide_to(y);
    while scroll.is_animating() {
        tokio::time::sleep(frame).await;
    }
    println!("Scrolled to {:.0}px", scroll.position());
}

fn print_events(rx: &mut mpsc::UnboundedReceiver<TransitionEvent>) {
    while let Ok(event) = rx.try_recv() {
        let line = match event {
            TransitionEvent::PageHidden { page } => format!("hidden    {}", page),
            TransitionEvent::PageDestroyed { page } => format!("destroyed {}", page),
            TransitionEvent::HistoryPushed { url } => format!("pushed    {}", url),
            TransitionEvent::ContentSwapped { template } => format!("swapped   {}", template),
            TransitionEvent::PageCreated { page } => format!("created   {}", page),
            TransitionEvent::PageShown { page } => format!("shown     {}", page),
            TransitionEvent::Failed { url, reason } => format!("failed    {}: {}", url, reason),
            TransitionEvent::Queued { url } => format!("queued    {}", url),
        };
        println!("  {}", line);
    }
}
