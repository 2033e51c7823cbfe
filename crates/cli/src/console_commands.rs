//! Console front end: stdin lines become inbound messages from one sender,
//! and everything the bot sends is printed to stdout.

use std::{sync::Arc, time::Duration};

use {
    anyhow::Result,
    chaosbot_channels::LocalProvider,
    chaosbot_chaos::ChaosBot,
    chaosbot_config::BotConfig,
    clap::Args,
    tokio::io::{AsyncBufReadExt, BufReader},
    tracing::{info, warn},
};

/// How often to check for running loops once stdin is closed.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Args)]
pub struct ConsoleArgs {
    /// Inbox id the typed messages come from.
    #[arg(long, default_value = "console-user")]
    sender: String,

    /// Inbox id of the bot itself.
    #[arg(long, default_value = "chaosbot")]
    inbox_id: String,
}

pub async fn run_console(config: BotConfig, args: ConsoleArgs) -> Result<()> {
    let provider = Arc::new(LocalProvider::new(args.inbox_id.as_str()));
    let conversation = provider.register_dm(args.sender.as_str());
    let mut outbound = provider.subscribe_outbound();
    let bot = Arc::new(ChaosBot::new(config, provider.clone()));

    info!(sender = %args.sender, conversation = %conversation, "console conversation ready");

    let printer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            println!("[{}] {}", message.conversation, message.text);
        }
    });

    let mut runner = {
        let bot = Arc::clone(&bot);
        tokio::spawn(async move { bot.run().await })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => {},
                Some(line) => provider.inject_text(args.sender.as_str(), line)?,
                None => {
                    info!("stdin closed, waiting for running chaos loops");
                    wait_for_idle(&bot).await;
                    break;
                },
            },
            result = &mut runner => {
                printer.abort();
                return match result {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(e.into()),
                    Err(e) => Err(e.into()),
                };
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            },
        }
    }

    bot.shutdown().await;
    runner.abort();
    printer.abort();
    Ok(())
}

/// Return once no chaos loop is running, or on Ctrl-C.
async fn wait_for_idle(bot: &ChaosBot) {
    loop {
        tokio::select! {
            () = tokio::time::sleep(IDLE_POLL) => {},
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "failed to listen for ctrl-c");
                }
                return;
            },
        }
        if bot.manager().active_count() == 0 {
            return;
        }
    }
}
