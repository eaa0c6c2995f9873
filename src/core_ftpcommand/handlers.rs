use crate::core_error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{
    cdup, cwd, dele, list, mkd, mode, noop, pass, pwd, quit, retr, rmd, rnfr, rnto, stor, syst,
    type_, user,
};
use crate::core_network::{pasv, port};
use crate::helpers::ControlWriter;
use crate::server::ServerState;
use crate::session::SharedSession;
use anyhow::{bail, Result};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// What the dispatcher does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    pub keep_open: bool,
    /// Diagnostics only.
    pub success: bool,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self {
            keep_open: true,
            success: true,
        }
    }

    pub fn failed() -> Self {
        Self {
            keep_open: true,
            success: false,
        }
    }

    pub fn close() -> Self {
        Self {
            keep_open: false,
            success: true,
        }
    }
}

pub type HandlerResult = Result<CommandOutcome, FtpError>;
pub type HandlerFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send>>;

pub type CommandHandler = Arc<
    dyn Fn(
            ControlWriter,
            Arc<ServerState>,
            SharedSession,
            Option<String>, // Unsplit argument
        ) -> HandlerFuture
        + Send
        + Sync,
>;

pub type CommandHandlers = HashMap<FtpCommand, CommandHandler>;

fn register<F, Fut>(handlers: &mut CommandHandlers, command: FtpCommand, handler: F)
where
    F: Fn(ControlWriter, Arc<ServerState>, SharedSession, Option<String>) -> Fut
        + Send
        + Sync
        + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    let handler: CommandHandler = Arc::new(
        move |writer: ControlWriter,
              state: Arc<ServerState>,
              session: SharedSession,
              arg: Option<String>| {
            Box::pin(handler(writer, state, session, arg)) as HandlerFuture
        },
    );
    handlers.insert(command, handler);
}

pub fn initialize_command_handlers() -> CommandHandlers {
    let mut handlers = CommandHandlers::new();

    register(&mut handlers, FtpCommand::USER, user::handle_user_command);
    register(&mut handlers, FtpCommand::PASS, pass::handle_pass_command);
    register(&mut handlers, FtpCommand::QUIT, quit::handle_quit_command);
    register(&mut handlers, FtpCommand::PWD, pwd::handle_pwd_command);
    register(&mut handlers, FtpCommand::SYST, syst::handle_syst_command);
    register(&mut handlers, FtpCommand::CWD, cwd::handle_cwd_command);
    register(&mut handlers, FtpCommand::CDUP, cdup::handle_cdup_command);
    register(&mut handlers, FtpCommand::NOOP, noop::handle_noop_command);
    register(&mut handlers, FtpCommand::MKD, mkd::handle_mkd_command);
    register(&mut handlers, FtpCommand::RMD, rmd::handle_rmd_command);
    register(&mut handlers, FtpCommand::DELE, dele::handle_dele_command);
    register(&mut handlers, FtpCommand::RNFR, rnfr::handle_rnfr_command);
    register(&mut handlers, FtpCommand::RNTO, rnto::handle_rnto_command);
    register(&mut handlers, FtpCommand::TYPE, type_::handle_type_command);
    register(&mut handlers, FtpCommand::MODE, mode::handle_mode_command);
    register(&mut handlers, FtpCommand::PORT, port::handle_port_command);
    register(&mut handlers, FtpCommand::PASV, pasv::handle_pasv_command);
    register(&mut handlers, FtpCommand::LIST, list::handle_list_command);
    register(&mut handlers, FtpCommand::RETR, retr::handle_retr_command);
    register(&mut handlers, FtpCommand::STOR, stor::handle_stor_command);

    // Other commands here !

    handlers
}

/// Fails if a known verb has no handler.
pub fn validate_command_handlers(handlers: &CommandHandlers) -> Result<()> {
    let missing: Vec<String> = FtpCommand::ALL
        .iter()
        .filter(|cmd| !handlers.contains_key(*cmd))
        .map(|cmd| format!("{:?}", cmd))
        .collect();
    if !missing.is_empty() {
        bail!("No handler registered for: {}", missing.join(", "));
    }
    Ok(())
}
