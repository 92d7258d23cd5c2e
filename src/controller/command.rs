use thiserror::Error;

/// One line of the page command language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    Pages,
    Open(String),
    New {
        id: String,
        name: String,
    },
    Rename {
        old_id: String,
        new_id: String,
        name: String,
    },
    Remove(String),
    Name(String),
    Add {
        tag: String,
        parent: Option<usize>,
        text: String,
    },
    Show {
        element: usize,
        page: String,
    },
    Hide {
        element: usize,
        page: String,
    },
    HideAll(usize),
    Link {
        element: usize,
        page: String,
    },
    Unlink(usize),
    Which(usize),
    In {
        element: usize,
        page: Option<String>,
    },
    Parent(usize),
    Draw,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("{command}: unexpected argument {argument:?}")]
    UnexpectedArgument {
        command: &'static str,
        argument: String,
    },
    #[error("invalid element handle: {0:?}")]
    InvalidHandle(String),
}

impl PageCommand {
    /// Parse one line. Blank lines and `#` comments give `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = split_word(trimmed);
        let command = match name {
            "pages" | "ls" => {
                no_more("pages", rest)?;
                PageCommand::Pages
            }
            "page" | "open" => {
                let (id, rest) = required("page", "page id", rest)?;
                no_more("page", rest)?;
                PageCommand::Open(id.to_string())
            }
            "new" => {
                let (id, rest) = required("new", "page id", rest)?;
                PageCommand::New {
                    id: id.to_string(),
                    name: text("new", "display name", rest)?,
                }
            }
            "rename" | "mv" => {
                let (old_id, rest) = required("rename", "page id", rest)?;
                let (new_id, rest) = required("rename", "new page id", rest)?;
                PageCommand::Rename {
                    old_id: old_id.to_string(),
                    new_id: new_id.to_string(),
                    name: text("rename", "display name", rest)?,
                }
            }
            "rm" => {
                let (id, rest) = required("rm", "page id", rest)?;
                no_more("rm", rest)?;
                PageCommand::Remove(id.to_string())
            }
            "name" => {
                let (id, rest) = required("name", "page id", rest)?;
                no_more("name", rest)?;
                PageCommand::Name(id.to_string())
            }
            "add" => {
                let (tag, rest) = required("add", "tag", rest)?;
                let (parent, rest) = match split_word(rest) {
                    (word, after) if word.starts_with('#') => (Some(handle(word)?), after),
                    _ => (None, rest),
                };
                PageCommand::Add {
                    tag: tag.to_string(),
                    parent,
                    text: rest.to_string(),
                }
            }
            "show" => {
                let (element, page) = element_and_page("show", rest)?;
                PageCommand::Show { element, page }
            }
            "hide" => {
                let (element, page) = element_and_page("hide", rest)?;
                PageCommand::Hide { element, page }
            }
            "hideall" => PageCommand::HideAll(single_element("hideall", rest)?),
            "link" => {
                let (element, page) = element_and_page("link", rest)?;
                PageCommand::Link { element, page }
            }
            "unlink" => PageCommand::Unlink(single_element("unlink", rest)?),
            "which" => PageCommand::Which(single_element("which", rest)?),
            "in" => {
                let (word, rest) = required("in", "element", rest)?;
                let element = handle(word)?;
                let (page, rest) = split_word(rest);
                no_more("in", rest)?;
                PageCommand::In {
                    element,
                    page: (!page.is_empty()).then(|| page.to_string()),
                }
            }
            "parent" => PageCommand::Parent(single_element("parent", rest)?),
            "draw" => {
                no_more("draw", rest)?;
                PageCommand::Draw
            }
            "quit" | "q" => PageCommand::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(end) => (&input[..end], input[end..].trim_start()),
        None => (input, ""),
    }
}

fn required<'a>(
    command: &'static str,
    argument: &'static str,
    input: &'a str,
) -> Result<(&'a str, &'a str), CommandError> {
    match split_word(input) {
        ("", _) => Err(CommandError::MissingArgument { command, argument }),
        found => Ok(found),
    }
}

fn text(command: &'static str, argument: &'static str, input: &str) -> Result<String, CommandError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }
    Ok(input.to_string())
}

fn no_more(command: &'static str, input: &str) -> Result<(), CommandError> {
    let input = input.trim();
    if input.is_empty() {
        Ok(())
    } else {
        Err(CommandError::UnexpectedArgument {
            command,
            argument: input.to_string(),
        })
    }
}

/// Element handles are written `#12`, the `#` being optional.
fn handle(word: &str) -> Result<usize, CommandError> {
    word.strip_prefix('#')
        .unwrap_or(word)
        .parse()
        .map_err(|_| CommandError::InvalidHandle(word.to_string()))
}

fn single_element(command: &'static str, input: &str) -> Result<usize, CommandError> {
    let (word, rest) = required(command, "element", input)?;
    let element = handle(word)?;
    no_more(command, rest)?;
    Ok(element)
}

fn element_and_page(command: &'static str, input: &str) -> Result<(usize, String), CommandError> {
    let (word, rest) = required(command, "element", input)?;
    let element = handle(word)?;
    let (page, rest) = required(command, "page id", rest)?;
    no_more(command, rest)?;
    Ok((element, page.to_string()))
}
