use anyhow::Result;
use chrono::Local;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::event::MessageUpdateEvent;
use serenity::model::gateway::Ready;
use serenity::model::id::{ChannelId, GuildId, MessageId};
use serenity::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use marvin::core::{logging, Config, Lifecycle, ReminderConfig};
use marvin::features::phrases::PhraseMatcher;
use marvin::features::places::Places;
use marvin::features::reminders::{
    reminder_loop, ChannelSink, Reminder, ReminderTarget, Scheduler, WeeklyRecurrence,
};
use marvin::features::retention::RetentionCache;
use marvin::message_handler::{is_own_message, MessageHandler};

/// Name of the weekly reminder job
const REMINDER_JOB: &str = "primantis";

struct Handler {
    messages: MessageHandler,
    lifecycle: Lifecycle,
    reminder: ReminderConfig,
    places: Places,
    reminder_started: AtomicBool,
}

impl Handler {
    fn new(
        messages: MessageHandler,
        lifecycle: Lifecycle,
        reminder: ReminderConfig,
        places: Places,
    ) -> Self {
        Handler {
            messages,
            lifecycle,
            reminder,
            places,
            reminder_started: AtomicBool::new(false),
        }
    }

    /// Register the weekly job and spawn the polling loop. Runs once, on the
    /// first ready event; reconnects reuse the running loop.
    fn start_reminder(&self, ctx: &Context) {
        if self.reminder_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let reminder_config = &self.reminder;
        let Some(target) = ReminderTarget::from_config(reminder_config) else {
            warn!("⏰ No reminder channel configured, weekly reminder disabled");
            return;
        };

        let at = match reminder_config.trigger_time() {
            Ok(at) => at,
            Err(e) => {
                error!("❌ {e}");
                return;
            }
        };
        let recurrence = WeeklyRecurrence::new(reminder_config.weekday, at);

        let reminder = Arc::new(Reminder::new(
            REMINDER_JOB,
            reminder_config.message.clone(),
            self.places.clone(),
            reminder_config.min_interval(),
        ));

        let mut scheduler = Scheduler::new();
        let next_run =
            scheduler.every(REMINDER_JOB, recurrence, reminder, Local::now().naive_local());
        info!("⏰ Reminder '{REMINDER_JOB}' scheduled {recurrence}, next run {next_run}");

        let sink = Arc::new(ChannelSink::new(ctx.cache.clone(), ctx.http.clone(), target));
        tokio::spawn(reminder_loop(
            self.lifecycle.clone(),
            scheduler,
            sink,
            reminder_config.poll_interval(),
        ));
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if is_own_message(&msg, ctx.cache.current_user_id()) {
            return;
        }

        self.messages.handle_message(&ctx, &msg).await;
    }

    async fn message_delete(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        _guild_id: Option<GuildId>,
    ) {
        self.messages
            .handle_delete(&ctx, channel_id, deleted_message_id)
            .await;
    }

    async fn message_update(
        &self,
        _ctx: Context,
        old_if_available: Option<Message>,
        new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        self.messages
            .handle_update(old_if_available, new, &event)
            .await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        self.start_reminder(&ctx);
        self.lifecycle.mark_ready();

        info!("Done startup");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    logging::init(&config.log_level, &config.log_file)?;

    info!("Starting Marvin...");

    let places = Places::from_config(config.places.as_deref());
    let messages = MessageHandler::new(
        RetentionCache::new(config.retention_window()),
        PhraseMatcher::new()?,
        places.clone(),
        config.admin,
        config.log_file.clone(),
    );

    let lifecycle = Lifecycle::new();
    let handler = Handler::new(messages, lifecycle.clone(), config.reminder.clone(), places);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    // Deleted messages are recovered from serenity's message cache
    let message_cache_size = config.message_cache_size;
    let mut client = Client::builder(&config.token, intents)
        .event_handler(handler)
        .cache_settings(|settings| settings.max_messages(message_cache_size))
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {e}");
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    let result = client.start().await;
    lifecycle.mark_closed();

    if let Err(why) = result {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
