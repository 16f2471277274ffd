/// External chat assistants a page can be handed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assistant {
    ChatGpt,
    Claude,
}

impl Assistant {
    fn base_url(self) -> &'static str {
        match self {
            Assistant::ChatGpt => "https://chatgpt.com/?hints=search&q=",
            Assistant::Claude => "https://claude.ai/new?q=",
        }
    }

    pub fn prompt(source_url: &str) -> String {
        format!("Read {source_url} so I can ask questions about it.")
    }

    /// Address that opens the assistant with the prompt pre-filled.
    pub fn launch_url(self, source_url: &str) -> String {
        format!(
            "{}{}",
            self.base_url(),
            urlencoding::encode(&Self::prompt(source_url))
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    CopyPage,
    CopyLink,
    ViewRaw,
    DownloadPage,
    OpenAssistant(Assistant),
}

impl Command {
    /// Parses a menu item's command identifier. Unknown identifiers yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "copy-page" => Some(Command::CopyPage),
            "copy-link" => Some(Command::CopyLink),
            "view-raw" => Some(Command::ViewRaw),
            "download-page" => Some(Command::DownloadPage),
            "open-chatgpt" => Some(Command::OpenAssistant(Assistant::ChatGpt)),
            "open-claude" => Some(Command::OpenAssistant(Assistant::Claude)),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Command::CopyPage => "copy-page",
            Command::CopyLink => "copy-link",
            Command::ViewRaw => "view-raw",
            Command::DownloadPage => "download-page",
            Command::OpenAssistant(Assistant::ChatGpt) => "open-chatgpt",
            Command::OpenAssistant(Assistant::Claude) => "open-claude",
        }
    }
}
