// Watch commands - Lines typed while a dashboard is being watched
use crate::domain::ui_state::{MAX_COLUMNS, MIN_COLUMNS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    /// `columns 3`
    Columns(u8),
    /// `order cpu,errors,latency`
    Order(Vec<String>),
}

impl WatchCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err("empty command".to_string());
        };
        let argument = words.next();
        if words.next().is_some() {
            return Err(format!("'{name}' takes a single argument"));
        }

        match (name, argument) {
            ("columns", Some(value)) => value
                .parse::<u8>()
                .map(WatchCommand::Columns)
                .map_err(|_| format!("columns must be a number from {MIN_COLUMNS} to {MAX_COLUMNS}")),
            ("order", Some(value)) => Ok(WatchCommand::Order(
                value
                    .split(',')
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            ("columns" | "order", None) => Err(format!("'{name}' needs an argument")),
            _ => Err(format!("unknown command '{name}', expected 'columns N' or 'order a,b,c'")),
        }
    }
}
