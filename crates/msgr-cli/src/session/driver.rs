//! Interactive session driver.
//!
//! Runs the menu state machine against live services: render the menu for
//! the current state, read one choice, invoke exactly one domain
//! operation, map the outcome to a `SessionEvent`, apply. Domain errors
//! are reported and the loop resumes in the same state; only `Exit`
//! terminates.

use chrono::{Duration, Utc};
use console::style;
use tracing::debug;

use msgr_core::session::{ChatChoice, MainChoice, SessionEvent, SessionState, UserChoice};

use crate::prompt::{
    confirm, prompt_choice, prompt_id, prompt_optional_text, prompt_password, prompt_text,
};
use crate::state::AppState;

use super::render;

/// Run the interactive session until the user exits.
pub async fn run(state: &AppState) -> anyhow::Result<()> {
    render::print_banner();

    let mut session = SessionState::MainMenu;
    while !session.is_terminal() {
        let event = match &session {
            SessionState::MainMenu => main_menu_turn(state).await?,
            SessionState::Authenticated { login } => user_menu_turn(state, login).await?,
            SessionState::ChatSelected { login, chat_id } => {
                chat_menu_turn(state, login, *chat_id).await?
            }
            SessionState::Exit => break,
        };
        debug!(state = %session, ?event, "menu transition");
        session = session.apply(event);
    }

    println!();
    println!("  {}", style("Goodbye.").dim());
    Ok(())
}

async fn main_menu_turn(state: &AppState) -> anyhow::Result<SessionEvent> {
    render::print_main_menu();
    let Some(choice) = MainChoice::from_choice(prompt_choice("Choice")?) else {
        render::print_info("Unrecognized choice.");
        return Ok(SessionEvent::Stay);
    };

    match choice {
        MainChoice::CreateUser => {
            let login = prompt_text("Login")?;
            let password = prompt_password("Password")?;
            let phone = prompt_text("Phone")?;
            let status = prompt_optional_text("Status (optional)")?;
            match state
                .identity_service
                .create_user(&login, &password, &phone, &status)
                .await
            {
                Ok(user) => render::print_info(&format!("User '{}' created. Log in to continue.", user.login)),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        MainChoice::LogIn => {
            let login = prompt_text("Login")?;
            let password = prompt_password("Password")?;
            match state.identity_service.authenticate(&login, &password).await {
                Ok(user) => Ok(SessionEvent::LoggedIn(user.login)),
                Err(e) => {
                    render::print_error(&e);
                    Ok(SessionEvent::Stay)
                }
            }
        }
        MainChoice::Exit => Ok(SessionEvent::Quit),
    }
}

async fn user_menu_turn(state: &AppState, login: &str) -> anyhow::Result<SessionEvent> {
    render::print_user_menu(login);
    let Some(choice) = UserChoice::from_choice(prompt_choice("Choice")?) else {
        render::print_info("Unrecognized choice.");
        return Ok(SessionEvent::Stay);
    };

    match choice {
        UserChoice::AddContact => {
            let target = prompt_text("Login to add")?;
            match state.identity_service.add_contact(login, &target).await {
                Ok(()) => render::print_info(&format!("'{target}' added to contacts.")),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        UserChoice::ListContacts => {
            match state.identity_service.list_contacts(login).await {
                Ok(contacts) => render::print_contacts(&contacts),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        UserChoice::ReadNotifications => {
            match state.notification_service.read_all(login).await {
                Ok(message_ids) => render::print_notifications(&message_ids),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        UserChoice::ListBlocked => {
            match state.identity_service.list_blocked(login).await {
                Ok(blocked) => render::print_logins("Blocked", &blocked),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        UserChoice::DeleteAccount => {
            if !confirm("Delete this account permanently?")? {
                return Ok(SessionEvent::Stay);
            }
            match state.identity_service.delete_account(login).await {
                Ok(()) => {
                    render::print_info("Account deleted.");
                    Ok(SessionEvent::AccountDeleted)
                }
                Err(e) => {
                    render::print_error(&e);
                    Ok(SessionEvent::Stay)
                }
            }
        }
        UserChoice::AddBlock => {
            let target = prompt_text("Login to block")?;
            match state.identity_service.add_block(login, &target).await {
                Ok(()) => render::print_info(&format!("'{target}' blocked.")),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        UserChoice::ListChats => {
            match state.chat_service.list_chats(login).await {
                Ok(chats) => render::print_chats(&chats),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        UserChoice::OpenChat => {
            let chat_id = prompt_id("Chat id")?;
            match state.chat_service.is_member(chat_id, login).await {
                Ok(true) => Ok(SessionEvent::ChatOpened(chat_id)),
                Ok(false) => {
                    render::print_info("You are not a member of that chat.");
                    Ok(SessionEvent::Stay)
                }
                Err(e) => {
                    render::print_error(&e);
                    Ok(SessionEvent::Stay)
                }
            }
        }
        UserChoice::StartChat => start_chat_flow(state, login).await,
        UserChoice::LogOut => Ok(SessionEvent::LoggedOut),
    }
}

/// Create a chat, invite members until a blank line, post the first
/// message. The first message makes the chat visible in the overview.
async fn start_chat_flow(state: &AppState, login: &str) -> anyhow::Result<SessionEvent> {
    let chat = match state.chat_service.start_chat(login).await {
        Ok(chat) => chat,
        Err(e) => {
            render::print_error(&e);
            return Ok(SessionEvent::Stay);
        }
    };
    render::print_info(&format!("Chat {} created.", chat.id));

    loop {
        let member = prompt_optional_text("Invite member (blank to finish)")?;
        if member.is_empty() {
            break;
        }
        match state.chat_service.add_member(chat.id, &member).await {
            Ok(()) => render::print_info(&format!("'{member}' joined chat {}.", chat.id)),
            Err(e) => render::print_error(&e),
        }
    }

    let body = prompt_text("First message")?;
    let expires_at = prompt_expiry()?;
    match state
        .message_service
        .create_message(chat.id, login, &body, expires_at)
        .await
    {
        Ok(_) => Ok(SessionEvent::ChatOpened(chat.id)),
        Err(e) => {
            render::print_error(&e);
            Ok(SessionEvent::ChatOpened(chat.id))
        }
    }
}

async fn chat_menu_turn(state: &AppState, login: &str, chat_id: i64) -> anyhow::Result<SessionEvent> {
    render::print_chat_menu(chat_id);
    let Some(choice) = ChatChoice::from_choice(prompt_choice("Choice")?) else {
        render::print_info("Unrecognized choice.");
        return Ok(SessionEvent::Stay);
    };

    match choice {
        ChatChoice::ListMembers => {
            match state.chat_service.list_members(chat_id).await {
                Ok(members) => render::print_logins("Members", &members),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        ChatChoice::AddMember => {
            let member = prompt_text("Login to add")?;
            match state.chat_service.add_member(chat_id, &member).await {
                Ok(()) => render::print_info(&format!("'{member}' joined the chat.")),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        ChatChoice::RemoveMember => {
            let member = prompt_text("Login to remove")?;
            match state.chat_service.remove_member(chat_id, &member).await {
                Ok(()) => render::print_info(&format!("'{member}' removed from the chat.")),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        ChatChoice::DeleteChat => {
            if !confirm("Delete this chat and all its messages?")? {
                return Ok(SessionEvent::Stay);
            }
            match state.chat_service.delete_chat(chat_id).await {
                Ok(()) => {
                    render::print_info("Chat deleted.");
                    Ok(SessionEvent::ChatDeleted)
                }
                Err(e) => {
                    render::print_error(&e);
                    Ok(SessionEvent::Stay)
                }
            }
        }
        ChatChoice::ViewMessages => {
            view_messages_flow(state, chat_id).await?;
            Ok(SessionEvent::Stay)
        }
        ChatChoice::CreateMessage => {
            let body = prompt_text("Message")?;
            let expires_at = prompt_expiry()?;
            match state
                .message_service
                .create_message(chat_id, login, &body, expires_at)
                .await
            {
                Ok(message) => render::print_info(&format!("Message {} sent.", message.id)),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        ChatChoice::DeleteMessage => {
            let message_id = prompt_id("Message id")?;
            match state.message_service.delete_message(message_id).await {
                Ok(()) => render::print_info("Message deleted."),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        ChatChoice::EditMessage => {
            let message_id = prompt_id("Message id")?;
            let body = prompt_text("New text")?;
            match state
                .message_service
                .edit_message(message_id, login, &body)
                .await
            {
                Ok(()) => render::print_info("Message updated."),
                Err(e) => render::print_error(&e),
            }
            Ok(SessionEvent::Stay)
        }
        ChatChoice::ExitChat => Ok(SessionEvent::ChatClosed),
    }
}

/// Page through a chat newest-first, `page_size` messages at a time.
async fn view_messages_flow(state: &AppState, chat_id: i64) -> anyhow::Result<()> {
    let page_size = i64::from(state.config.page_size);
    let mut offset = 0;

    loop {
        let page = match state
            .message_service
            .view_messages(chat_id, offset, page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                render::print_error(&e);
                return Ok(());
            }
        };

        if page.is_empty() {
            if offset == 0 {
                println!();
                println!("  {}", style("No messages yet.").dim());
            } else {
                println!("  {}", style("No more messages.").dim());
            }
            return Ok(());
        }

        render::print_messages(&page);

        if (page.len() as i64) < page_size {
            return Ok(());
        }
        if !confirm("Load more?")? {
            return Ok(());
        }
        offset += page_size;
    }
}

/// Optional self-destruct: blank keeps the message forever, a number of
/// minutes sets `expires_at` that far in the future.
fn prompt_expiry() -> anyhow::Result<Option<chrono::DateTime<Utc>>> {
    loop {
        let raw = prompt_optional_text("Expires in minutes (blank = never)")?;
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<i64>() {
            Ok(minutes) if minutes > 0 => {
                return Ok(Some(Utc::now() + Duration::minutes(minutes)));
            }
            _ => render::print_info("Enter a positive number of minutes, or leave blank."),
        }
    }
}
