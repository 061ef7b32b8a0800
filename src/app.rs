//! Main application orchestration and execution

use crate::{
    analysis::report::generate_report,
    cli::Cli,
    client::{PageSpeedClient, PerformanceApi},
    config::{display_config_summary, load_config, validate_config},
    error::Result,
    logging::{context, LogLevel, StructuredLogger},
    models::context::ProjectContext,
    output::OutputCoordinator,
};

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        // Load and validate configuration
        let config = load_config(self.cli.clone())?;
        let warnings = validate_config(&config)?;

        let logger = StructuredLogger::from_flags(config.debug, config.json_output);

        if config.debug {
            println!("Configuration Summary:");
            println!("{}", display_config_summary(&config));
        }

        let coordinator = OutputCoordinator::new(&config);
        for warning in &warnings {
            coordinator.display_warning(&warning.format(config.enable_color))?;
        }

        // Optional technology-stack context from an external detector
        let project_context = config
            .project_context_path
            .as_deref()
            .map(ProjectContext::from_file)
            .transpose()?;
        if let Some(ctx) = &project_context {
            logger.log_with_context(
                LogLevel::Debug,
                "loaded project context",
                context(&[(
                    "framework",
                    ctx.framework.as_ref().map(|f| f.name.as_str()).unwrap_or("none"),
                )]),
            );
        }

        let client = PageSpeedClient::new(&config)?;

        // Strategies share nothing, so they can run fully in parallel
        logger.log_with_context(
            LogLevel::Info,
            "starting analysis",
            context(&[("url", &config.target_url)]),
        );
        let runs = config
            .strategies
            .iter()
            .map(|strategy| client.analyze(&config.target_url, *strategy));
        let results = futures::future::join_all(runs).await;

        for (strategy, result) in config.strategies.iter().zip(results) {
            let result = result?;
            logger.log_with_context(
                LogLevel::Info,
                "analysis complete",
                context(&[
                    ("strategy", strategy.as_str()),
                    (
                        "score",
                        &result
                            .scores
                            .performance
                            .map(|s| s.to_string())
                            .unwrap_or_else(|| "n/a".to_string()),
                    ),
                ]),
            );

            let report = generate_report(result, project_context.clone());
            coordinator.display(&report)?;
        }

        Ok(())
    }
}
