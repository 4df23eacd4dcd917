mod config;
mod error;
mod messages;
mod quiz;
mod recorder;

use std::sync::Arc;

use chrono::{Local, Utc};
use log::debug;
use quiz::{
    generator::QuestionGenerator,
    session::{QuizSession, QuizSettings, SessionError, SessionState},
};
use recorder::ResultRecorder;
use teloxide::{
    dispatching::dialogue::{serializer::Json, ErasedStorage, SqliteStorage, Storage},
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove},
};

type QuizDialogue = Dialogue<SessionState, ErasedStorage<SessionState>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type SessionStorage = std::sync::Arc<ErasedStorage<SessionState>>;

/// Shared by every chat; sessions themselves live in the dialogue storage.
pub struct App {
    generator: QuestionGenerator,
    recorder: Arc<dyn ResultRecorder>,
    settings: QuizSettings,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    if let Err(err) = run().await {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> HandlerResult {
    let config = config::Config::from_env()?;
    log::info!(
        "Starting unit circle bot ({} variant, results in {})...",
        config.variant,
        config.store.describe()
    );

    let bot = Bot::from_env();

    log::info!("Opening dialogue storage at {}", config.dialogue_db);
    let storage: SessionStorage = SqliteStorage::open(&config.dialogue_db, Json)
        .await?
        .erase();

    let app = Arc::new(App {
        generator: QuestionGenerator::for_variant(config.variant),
        recorder: config.store.build(),
        settings: config.quiz,
    });
    log::info!(
        "Asking {:?} for {} seconds",
        app.generator.kinds(),
        app.settings.duration_secs
    );

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<SessionState>, SessionState>()
            .branch(dptree::case![SessionState::Start].endpoint(greet))
            .branch(dptree::case![SessionState::Idle].endpoint(receive_name))
            .branch(dptree::case![SessionState::NameEntered { name }].endpoint(receive_start))
            .branch(dptree::case![SessionState::Active { session }].endpoint(receive_answer))
            .branch(dptree::case![SessionState::Finished { outcome }].endpoint(receive_restart)),
    )
    .dependencies(dptree::deps![storage, app])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

fn single_button(text: &str) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(text)]])
}

async fn greet(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, messages::GREETING_TEXT)
        .reply_markup(KeyboardRemove::new())
        .await?;
    dialogue.update(SessionState::Start.greet()?).await?;
    Ok(())
}

async fn receive_name(bot: Bot, dialogue: QuizDialogue, msg: Message, app: Arc<App>) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    if text.starts_with('/') {
        bot.send_message(msg.chat.id, messages::GREETING_TEXT)
            .reply_markup(KeyboardRemove::new())
            .await?;
        return Ok(());
    }

    match SessionState::Idle.enter_name(text) {
        Ok(next) => {
            if let SessionState::NameEntered { name } = &next {
                bot.send_message(
                    msg.chat.id,
                    messages::ready_text(name, app.settings.duration_secs),
                )
                .reply_markup(single_button(messages::START_QUIZ))
                .await?;
            }
            dialogue.update(next).await?;
        }
        Err(SessionError::EmptyName) => {
            bot.send_message(msg.chat.id, "Please enter your name (as text) to begin")
                .await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn receive_start(
    bot: Bot,
    dialogue: QuizDialogue,
    name: String,
    msg: Message,
    app: Arc<App>,
) -> HandlerResult {
    if msg.text() != Some(messages::START_QUIZ) {
        bot.send_message(
            msg.chat.id,
            format!("Press \"{}\" when you are ready, {}", messages::START_QUIZ, name),
        )
        .reply_markup(single_button(messages::START_QUIZ))
        .await?;
        return Ok(());
    }

    let now = Utc::now();
    let next = SessionState::NameEntered { name }.start(
        &app.generator,
        &app.settings,
        now,
        &mut rand::thread_rng(),
    )?;

    if let SessionState::Active { session } = &next {
        send_question(&bot, msg.chat.id, session, app.settings.duration_secs, None).await?;
    }
    dialogue.update(next).await?;
    Ok(())
}

async fn receive_answer(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: QuizSession,
    msg: Message,
    app: Arc<App>,
) -> HandlerResult {
    // The clock is only looked at when the user does something
    if session.is_expired(Utc::now(), app.settings.duration_secs) {
        return finish_quiz(bot, dialogue, session, msg, app).await;
    }

    let answer = match msg.text() {
        Some(answer) => answer,
        None => {
            bot.send_message(msg.chat.id, "Please answer with text").await?;
            return Ok(());
        }
    };
    let expected = session
        .current_question()
        .map(|q| q.answer.clone())
        .unwrap_or_default();

    let submitted = session.submit(
        answer,
        &app.generator,
        app.settings.extend_batch,
        &mut rand::thread_rng(),
    );
    let feedback = match submitted {
        Ok(correct) => messages::feedback_text(correct, &expected),
        Err(SessionError::NotAChoice(choice)) => {
            debug!("Ignoring {:?}, not one of the options", choice);
            bot.send_message(msg.chat.id, "Please pick one of the options below")
                .await?;
            let remaining = session.remaining_secs(Utc::now(), app.settings.duration_secs);
            send_question(&bot, msg.chat.id, &session, remaining, None).await?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if session.is_expired(Utc::now(), app.settings.duration_secs) {
        bot.send_message(msg.chat.id, feedback).await?;
        return finish_quiz(bot, dialogue, session, msg, app).await;
    }

    let remaining = session.remaining_secs(Utc::now(), app.settings.duration_secs);
    send_question(&bot, msg.chat.id, &session, remaining, Some(&feedback)).await?;
    dialogue.update(SessionState::Active { session }).await?;
    Ok(())
}

async fn finish_quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    session: QuizSession,
    msg: Message,
    app: Arc<App>,
) -> HandlerResult {
    let finished = SessionState::finish(&session, app.recorder.as_ref(), Local::now()).await;
    if let SessionState::Finished { outcome } = &finished {
        bot.send_message(msg.chat.id, messages::results_text(outcome))
            .reply_markup(single_button(messages::RESTART))
            .await?;
    }
    dialogue.update(finished).await?;
    Ok(())
}

async fn receive_restart(
    bot: Bot,
    dialogue: QuizDialogue,
    outcome: quiz::results::SessionOutcome,
    msg: Message,
) -> HandlerResult {
    if msg.text() != Some(messages::RESTART) {
        bot.send_message(msg.chat.id, messages::results_text(&outcome))
            .reply_markup(single_button(messages::RESTART))
            .await?;
        return Ok(());
    }

    let next = SessionState::Finished { outcome }.restart();
    bot.send_message(msg.chat.id, messages::GREETING_TEXT)
        .reply_markup(KeyboardRemove::new())
        .await?;
    dialogue.update(next).await?;
    Ok(())
}

async fn send_question(
    bot: &Bot,
    chat_id: ChatId,
    session: &QuizSession,
    remaining_secs: i64,
    feedback: Option<&str>,
) -> HandlerResult {
    let mut text = messages::question_text(session, remaining_secs);
    if let Some(feedback) = feedback {
        text = format!("{}\n\n{}", feedback, text);
    }

    let choices = session.current_question().and_then(|q| q.choices.as_ref());
    match choices {
        Some(choices) => {
            let keyboard = KeyboardMarkup::new(
                messages::choice_rows(choices)
                    .into_iter()
                    .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
                    .collect::<Vec<_>>(),
            );
            bot.send_message(chat_id, text).reply_markup(keyboard).await?;
        }
        None => {
            bot.send_message(chat_id, text)
                .reply_markup(KeyboardRemove::new())
                .await?;
        }
    }
    Ok(())
}
