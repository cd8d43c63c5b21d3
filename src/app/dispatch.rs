use crate::app::status::render_status;
use crate::cli::commands::{Cli, Commands};
use anyhow::Result;
use siteconsent::consent::{ConsentChoice, build_controller};
use siteconsent::{Category, Config, PageShell};
use tracing::info;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let controller = build_controller(&config);
    controller.mount().await;

    match cli.command {
        Commands::Status => {}
        Commands::AcceptAll => {
            controller.accept_all().await;
        }
        Commands::EssentialOnly => {
            controller.essential_only().await;
        }
        Commands::Customize {
            performance,
            functional,
            targeting,
        } => {
            let choice = ConsentChoice::default()
                .with(Category::Performance, performance)
                .with(Category::Functional, functional)
                .with(Category::Targeting, targeting);
            controller.confirm_custom(&choice).await;
        }
        Commands::Clear => {
            controller.clear().await;
            info!("Stored consent cleared");
        }
        Commands::Head => {
            let shell = PageShell::new(controller.store().clone(), config.analytics.clone());
            let head = shell.render_head();
            if head.is_empty() {
                println!("<!-- analytics not mounted -->");
            } else {
                print!("{head}");
            }
            return Ok(());
        }
    }

    controller.settle_analytics().await;
    println!("{}", render_status(&config, &controller));
    Ok(())
}
