use clap::{Parser, Subcommand};

/// `siteconsent` - Cookie-consent state, persistence and analytics gating.
#[derive(Parser, Debug)]
#[command(name = "siteconsent")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "Inspect and drive the stored cookie-consent decision.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the consent phase, stored record and analytics state
    Status,

    /// Grant every cookie category
    AcceptAll,

    /// Keep strictly necessary cookies only
    EssentialOnly,

    /// Confirm a custom selection (unlisted categories are declined)
    Customize {
        /// Allow performance / analytics cookies
        #[arg(long)]
        performance: bool,

        /// Allow functional cookies
        #[arg(long)]
        functional: bool,

        /// Allow targeting cookies
        #[arg(long)]
        targeting: bool,
    },

    /// Remove the stored decision (debugging)
    Clear,

    /// Print the analytics <head> markup the page shell would render
    Head,
}
