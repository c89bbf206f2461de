use ingest_core::{Msg, SelectedFile};

pub const HELP: &str = "\
Commands:
  type <name>        choose the product type
  structure <name>   choose the product structure
  file <path>        choose the file to ingest (no path clears it)
  ingest             ingest the chosen file
  show               redraw the form
  help               show this text
  quit               leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg(Msg),
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Translates one line of user input into a form command.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "type" => Command::Msg(Msg::ProductTypeChanged(rest.to_string())),
        "structure" => Command::Msg(Msg::ProductStructureChanged(rest.to_string())),
        "file" => {
            let files = if rest.is_empty() {
                Vec::new()
            } else {
                vec![SelectedFile::from_path(rest)]
            };
            Command::Msg(Msg::FileSelected(files))
        }
        "ingest" => Command::Msg(Msg::IngestClicked),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn selector_commands_keep_spaces_in_values() {
        assert_eq!(
            parse_command("type  Generic File "),
            Command::Msg(Msg::ProductTypeChanged("Generic File".to_string()))
        );
        assert_eq!(
            parse_command("STRUCTURE Flat"),
            Command::Msg(Msg::ProductStructureChanged("Flat".to_string()))
        );
    }

    #[test]
    fn file_command_selects_or_clears() {
        assert_eq!(
            parse_command("file /data/my granule.nc"),
            Command::Msg(Msg::FileSelected(vec![SelectedFile::from_path(
                "/data/my granule.nc"
            )]))
        );
        assert_eq!(
            parse_command("file"),
            Command::Msg(Msg::FileSelected(Vec::new()))
        );
    }

    #[test]
    fn plain_commands() {
        assert_eq!(parse_command("ingest"), Command::Msg(Msg::IngestClicked));
        assert_eq!(parse_command("  "), Command::Empty);
        assert_eq!(parse_command("show"), Command::Show);
        assert_eq!(parse_command("?"), Command::Help);
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command("upload x"), Command::Unknown("upload".to_string()));
    }
}
