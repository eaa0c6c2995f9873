#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PWD,
    SYST,
    CWD,
    CDUP,
    NOOP,
    MKD,
    RMD,
    DELE,
    RNFR,
    RNTO,
    TYPE,
    MODE,
    PORT,
    PASV,
    LIST,
    RETR,
    STOR,
}

impl FtpCommand {
    /// Every verb the server answers; each needs a registered handler.
    pub const ALL: [FtpCommand; 20] = [
        FtpCommand::USER,
        FtpCommand::PASS,
        FtpCommand::QUIT,
        FtpCommand::PWD,
        FtpCommand::SYST,
        FtpCommand::CWD,
        FtpCommand::CDUP,
        FtpCommand::NOOP,
        FtpCommand::MKD,
        FtpCommand::RMD,
        FtpCommand::DELE,
        FtpCommand::RNFR,
        FtpCommand::RNTO,
        FtpCommand::TYPE,
        FtpCommand::MODE,
        FtpCommand::PORT,
        FtpCommand::PASV,
        FtpCommand::LIST,
        FtpCommand::RETR,
        FtpCommand::STOR,
    ];

    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "PWD" => Some(FtpCommand::PWD),
            "SYST" => Some(FtpCommand::SYST),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "NOOP" => Some(FtpCommand::NOOP),
            "MKD" => Some(FtpCommand::MKD),
            "RMD" => Some(FtpCommand::RMD),
            "DELE" => Some(FtpCommand::DELE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "TYPE" => Some(FtpCommand::TYPE),
            "MODE" => Some(FtpCommand::MODE),
            "PORT" => Some(FtpCommand::PORT),
            "PASV" => Some(FtpCommand::PASV),
            "LIST" => Some(FtpCommand::LIST),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            _ => None,
        }
    }
}

/// One decoded control line: the verb and the unsplit rest of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub verb: String,
    pub arg: Option<String>,
}

impl CommandLine {
    /// Splits once on the first whitespace, so arguments keep embedded spaces.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, Some(rest)),
            None => (line, None),
        };
        CommandLine {
            verb: verb.to_ascii_uppercase(),
            arg: rest.filter(|r| !r.is_empty()).map(str::to_string),
        }
    }

    pub fn command(&self) -> Option<FtpCommand> {
        FtpCommand::from_str(&self.verb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_are_case_insensitive() {
        assert_eq!(FtpCommand::from_str("user"), Some(FtpCommand::USER));
        assert_eq!(FtpCommand::from_str("Retr"), Some(FtpCommand::RETR));
        assert_eq!(FtpCommand::from_str("FOOBAR"), None);
        assert_eq!(FtpCommand::from_str(""), None);
    }

    #[test]
    fn every_listed_verb_round_trips_through_its_name() {
        for cmd in FtpCommand::ALL {
            assert_eq!(FtpCommand::from_str(&format!("{:?}", cmd)), Some(cmd));
        }
    }

    #[test]
    fn parse_keeps_spaces_in_arguments() {
        let line = CommandLine::parse("CWD my holiday photos\r\n");
        assert_eq!(line.verb, "CWD");
        assert_eq!(line.arg.as_deref(), Some("my holiday photos"));
        assert_eq!(line.command(), Some(FtpCommand::CWD));
    }

    #[test]
    fn parse_without_argument() {
        let line = CommandLine::parse("pwd\r\n");
        assert_eq!(line.verb, "PWD");
        assert_eq!(line.arg, None);

        let line = CommandLine::parse("LIST \r\n");
        assert_eq!(line.arg, None);

        let line = CommandLine::parse("\r\n");
        assert_eq!(line.verb, "");
        assert_eq!(line.command(), None);
    }
}
