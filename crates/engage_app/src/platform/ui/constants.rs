pub const CMD_OPEN: &str = "open";
pub const CMD_DROP: &str = "drop";
pub const CMD_HOVER: &str = "hover";
pub const CMD_LEAVE: &str = "leave";
pub const CMD_SUBMIT: &str = "submit";
pub const CMD_DISMISS: &str = "dismiss";
pub const CMD_HELP: &str = "help";
pub const CMD_QUIT: &str = "quit";

pub const PROMPT: &str = "engage> ";

pub const HELP_TEXT: &str = "\
Commands:
  open <path>        choose a file (image or PDF)
  drop <path>...     drop files on the drop zone; the first one is used
  hover | leave      drag a file over the drop zone / away from it
  submit             upload the chosen file and fetch recommendations
  dismiss            clear the current notice
  help               show this help
  quit               exit
Dragging a file onto the terminal pastes its path; that counts as a drop.";
