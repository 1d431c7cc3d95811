use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the chatbot backend (serves /api/conversations and /api/messages)
    #[arg(long, env = "CHAT_SERVER_URL", default_value = "http://localhost:3000")]
    pub server_url: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Send this message and exit instead of starting the interactive prompt.
    /// May be repeated; messages are sent in order, each after the previous reply finished.
    #[arg(short = 'm', long = "message")]
    pub messages: Vec<String>,

    /// Skip the header, welcome text and footer.
    #[arg(long, env = "CHAT_NO_BANNER", default_value = "false")]
    pub no_banner: bool,
}
