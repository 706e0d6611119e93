//! Token command - mint and inspect credential tokens.

use anyhow::Result;
use clap::Subcommand;
use console::style;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum TokenCommands {
    /// Wrap a mailbox password into a time-limited token
    Encode {
        /// Mailbox password
        secret: String,

        /// Validity window in seconds (defaults to the configured life)
        #[arg(short, long)]
        life: Option<u64>,
    },

    /// Print the validity window embedded in a token
    Life {
        /// Credential token
        token: String,
    },
}

pub fn execute(command: TokenCommands, ctx: &Context) -> Result<i32> {
    match command {
        TokenCommands::Encode { secret, life } => {
            let token = ctx.config.encode_token(&secret, life)?;
            let life = life.unwrap_or(ctx.config.token.life);
            eprintln!(
                "{} Token valid until the current {} window ends",
                style("Info:").cyan(),
                format_life(life)
            );
            println!("{}", token);
        }
        TokenCommands::Life { token } => {
            let life = mailpack_token::get_life(&token)?;
            println!("{} ({})", life, format_life(life));
        }
    }
    Ok(0)
}

/// Render a number of seconds as the largest whole unit.
pub fn format_life(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;

    let (count, unit) = if seconds >= DAY && seconds % DAY == 0 {
        (seconds / DAY, "day")
    } else if seconds >= HOUR && seconds % HOUR == 0 {
        (seconds / HOUR, "hour")
    } else if seconds >= MINUTE && seconds % MINUTE == 0 {
        (seconds / MINUTE, "minute")
    } else {
        (seconds, "second")
    };

    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_life() {
        assert_eq!(format_life(604800), "7 days");
        assert_eq!(format_life(3600), "1 hour");
        assert_eq!(format_life(5400), "90 minutes");
        assert_eq!(format_life(61), "61 seconds");
        assert_eq!(format_life(1), "1 second");
    }
}
