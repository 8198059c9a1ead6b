//! Session state machine for the interactive menus.
//!
//! The three-level menu (main -> user -> chat) is an explicit finite-state
//! machine instead of nested loops with mutable booleans: an enumerated
//! [`SessionState`], an enumerated [`SessionEvent`], and a total transition
//! function [`SessionState::apply`]. Menu choices parse through the
//! `*Choice` enums; anything unparseable never produces an event, so
//! invalid input can only re-prompt, never transition.
//!
//! The CLI drives the machine: render the menu for the current state, read
//! one choice, invoke exactly one domain operation, map its outcome to an
//! event, apply.

use std::fmt;

/// The session's position in the menu hierarchy.
///
/// A fresh session starts in `MainMenu` (the anonymous state transitions
/// there unconditionally at startup). `Exit` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    MainMenu,
    Authenticated { login: String },
    ChatSelected { login: String, chat_id: i64 },
    Exit,
}

impl SessionState {
    /// Whether the session has terminated.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Exit)
    }

    /// The authenticated login, if any.
    pub fn login(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { login }
            | SessionState::ChatSelected { login, .. } => Some(login),
            _ => None,
        }
    }

    /// Apply an event, producing the next state.
    ///
    /// The function is total: an event that makes no sense in the current
    /// state leaves the state unchanged, mirroring the rule that a failed
    /// or invalid operation never unwinds more than one menu level.
    pub fn apply(self, event: SessionEvent) -> SessionState {
        match (self, event) {
            (SessionState::MainMenu, SessionEvent::LoggedIn(login)) => {
                SessionState::Authenticated { login }
            }
            (SessionState::MainMenu, SessionEvent::Quit) => SessionState::Exit,

            (SessionState::Authenticated { login }, SessionEvent::ChatOpened(chat_id)) => {
                SessionState::ChatSelected { login, chat_id }
            }
            (SessionState::Authenticated { .. }, SessionEvent::LoggedOut)
            | (SessionState::Authenticated { .. }, SessionEvent::AccountDeleted) => {
                SessionState::MainMenu
            }

            (SessionState::ChatSelected { login, .. }, SessionEvent::ChatClosed)
            | (SessionState::ChatSelected { login, .. }, SessionEvent::ChatDeleted) => {
                SessionState::Authenticated { login }
            }

            // Stay, and any event foreign to the current state: no transition.
            (state, _) => state,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::MainMenu => write!(f, "main menu"),
            SessionState::Authenticated { login } => write!(f, "user menu ({login})"),
            SessionState::ChatSelected { login, chat_id } => {
                write!(f, "chat {chat_id} ({login})")
            }
            SessionState::Exit => write!(f, "exit"),
        }
    }
}

/// Outcome of one menu iteration, fed back into the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Authentication succeeded for this login.
    LoggedIn(String),
    /// The user chose to log out.
    LoggedOut,
    /// The account behind the current session was deleted.
    AccountDeleted,
    /// A membership-validated chat was entered.
    ChatOpened(i64),
    /// The user left the chat menu.
    ChatClosed,
    /// The currently open chat was deleted.
    ChatDeleted,
    /// The user chose to end the session.
    Quit,
    /// The operation completed (or failed and was reported); remain in the
    /// current state.
    Stay,
}

/// Main-menu choices (create user, log in, exit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    CreateUser,
    LogIn,
    Exit,
}

impl MainChoice {
    /// Map a numeric menu choice; `None` re-prompts.
    pub fn from_choice(n: u32) -> Option<Self> {
        match n {
            1 => Some(MainChoice::CreateUser),
            2 => Some(MainChoice::LogIn),
            9 => Some(MainChoice::Exit),
            _ => None,
        }
    }
}

/// User-menu choices, numbered as presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserChoice {
    AddContact,
    ListContacts,
    ReadNotifications,
    ListBlocked,
    DeleteAccount,
    AddBlock,
    ListChats,
    OpenChat,
    StartChat,
    LogOut,
}

impl UserChoice {
    /// Map a numeric menu choice; `None` re-prompts.
    pub fn from_choice(n: u32) -> Option<Self> {
        match n {
            1 => Some(UserChoice::AddContact),
            2 => Some(UserChoice::ListContacts),
            3 => Some(UserChoice::ReadNotifications),
            4 => Some(UserChoice::ListBlocked),
            5 => Some(UserChoice::DeleteAccount),
            6 => Some(UserChoice::AddBlock),
            7 => Some(UserChoice::ListChats),
            8 => Some(UserChoice::OpenChat),
            9 => Some(UserChoice::StartChat),
            10 => Some(UserChoice::LogOut),
            _ => None,
        }
    }
}

/// Chat-menu choices, numbered as presented ("exit chat" keeps its
/// traditional slot at 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatChoice {
    ListMembers,
    AddMember,
    RemoveMember,
    DeleteChat,
    ViewMessages,
    CreateMessage,
    DeleteMessage,
    EditMessage,
    ExitChat,
}

impl ChatChoice {
    /// Map a numeric menu choice; `None` re-prompts.
    pub fn from_choice(n: u32) -> Option<Self> {
        match n {
            1 => Some(ChatChoice::ListMembers),
            2 => Some(ChatChoice::AddMember),
            3 => Some(ChatChoice::RemoveMember),
            4 => Some(ChatChoice::DeleteChat),
            5 => Some(ChatChoice::ViewMessages),
            6 => Some(ChatChoice::CreateMessage),
            7 => Some(ChatChoice::DeleteMessage),
            8 => Some(ChatChoice::EditMessage),
            10 => Some(ChatChoice::ExitChat),
            _ => None,
        }
    }
}
