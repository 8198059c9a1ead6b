//! Menu and table rendering for the interactive session.
//!
//! All output formatting lives here so the driver stays a pure
//! read-choice / call-service / apply-event loop.

use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use msgr_types::chat::ChatSummary;
use msgr_types::message::MessageView;
use msgr_types::user::ContactEntry;

/// Print the startup banner.
pub fn print_banner() {
    println!();
    println!(
        "  {} {}",
        style("msgr").cyan().bold(),
        style("-- interactive messaging").dim()
    );
    println!();
}

/// Print the main (anonymous) menu.
pub fn print_main_menu() {
    println!();
    println!("  {}", style("MAIN MENU").bold());
    println!("  ---------");
    println!("  1. Create user");
    println!("  2. Log in");
    println!("  9. Exit");
}

/// Print the user menu for an authenticated login.
pub fn print_user_menu(login: &str) {
    println!();
    println!("  {} ({})", style("USER MENU").bold(), style(login).cyan());
    println!("  ---------");
    println!("  1.  Add to contact list");
    println!("  2.  Browse contact list");
    println!("  3.  Read notifications");
    println!("  4.  Browse block list");
    println!("  5.  Delete account");
    println!("  6.  Add to block list");
    println!("  7.  Browse chats");
    println!("  8.  Open chat");
    println!("  9.  Start new chat");
    println!("  10. Log out");
}

/// Print the chat menu for an open chat.
pub fn print_chat_menu(chat_id: i64) {
    println!();
    println!("  {} (chat {})", style("CHAT MENU").bold(), style(chat_id).cyan());
    println!("  ---------");
    println!("  1.  List members");
    println!("  2.  Add member");
    println!("  3.  Remove member");
    println!("  4.  Delete chat");
    println!("  5.  View messages");
    println!("  6.  Write message");
    println!("  7.  Delete message");
    println!("  8.  Edit message");
    println!("  10. Exit chat");
}

/// Report a domain error without leaving the current menu.
pub fn print_error(err: &dyn std::error::Error) {
    eprintln!("  {} {err}", style("!").red().bold());
}

/// Print an informational line.
pub fn print_info(message: &str) {
    println!("  {} {message}", style("*").cyan().bold());
}

fn header_cell(name: &str) -> Cell {
    Cell::new(name).fg(Color::White)
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render the contact list with each contact's status line.
pub fn print_contacts(contacts: &[ContactEntry]) {
    if contacts.is_empty() {
        println!();
        println!("  {}", style("Contact list is empty.").dim());
        return;
    }

    let mut table = new_table();
    table.set_header(vec![header_cell("Login"), header_cell("Status")]);
    for contact in contacts {
        let status = if contact.status.is_empty() {
            Cell::new("-").fg(Color::DarkGrey)
        } else {
            Cell::new(&contact.status)
        };
        table.add_row(vec![Cell::new(&contact.login).fg(Color::Cyan), status]);
    }
    println!();
    println!("{table}");
}

/// Render a plain list of logins (block list, chat members).
pub fn print_logins(title: &str, logins: &[String]) {
    println!();
    if logins.is_empty() {
        println!("  {}", style(format!("{title}: none.")).dim());
        return;
    }
    println!("  {}", style(title).bold());
    for login in logins {
        println!("    {}", style(login).cyan());
    }
}

/// Render the chat overview, most recently active first.
pub fn print_chats(chats: &[ChatSummary]) {
    if chats.is_empty() {
        println!();
        println!("  {}", style("No chats with messages yet.").dim());
        return;
    }

    let mut table = new_table();
    table.set_header(vec![header_cell("Chat"), header_cell("Last activity")]);
    for chat in chats {
        table.add_row(vec![
            Cell::new(chat.chat_id).fg(Color::Cyan),
            Cell::new(chat.last_activity.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }
    println!();
    println!("{table}");
}

/// Render one page of messages, newest first.
pub fn print_messages(messages: &[MessageView]) {
    let mut table = new_table();
    table.set_header(vec![
        header_cell("Sender"),
        header_cell("Sent"),
        header_cell("Message"),
        header_cell("Media"),
    ]);
    for view in messages {
        let media = match (&view.media_type, &view.url) {
            (Some(media_type), Some(url)) => Cell::new(format!("{media_type} {url}")),
            _ => Cell::new("-").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(&view.sender_login).fg(Color::Cyan),
            Cell::new(view.sent_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&view.body),
            media,
        ]);
    }
    println!();
    println!("{table}");
}

/// Render pending notifications as message references.
pub fn print_notifications(message_ids: &[i64]) {
    println!();
    if message_ids.is_empty() {
        println!("  {}", style("No new notifications.").dim());
        return;
    }
    println!(
        "  {} new notification{}:",
        style(message_ids.len()).bold(),
        if message_ids.len() == 1 { "" } else { "s" }
    );
    for id in message_ids {
        println!("    message {}", style(id).cyan());
    }
}
