use std::io::Read;

use anyhow::Context;

/// Compute effective limit with precedence: local arg -> global flag -> fallback.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    local.or(global).unwrap_or(fallback)
}

/// Inline text, or all of stdin when the argument is `-`.
pub fn read_text_arg(arg: &str) -> anyhow::Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("failed to read text from stdin")?;
    Ok(text)
}

/// Reject blank input before anything is sent.
pub fn require_text(text: &str) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("nothing to analyze: the text is empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{effective_limit, read_text_arg, require_text};

    #[test]
    fn local_takes_precedence() {
        assert_eq!(effective_limit(Some(5), Some(10), 20), 5);
    }

    #[test]
    fn global_used_when_local_missing() {
        assert_eq!(effective_limit(None, Some(10), 20), 10);
    }

    #[test]
    fn fallback_used_when_none_set() {
        assert_eq!(effective_limit(None, None, 20), 20);
    }

    #[test]
    fn inline_text_is_returned_verbatim() {
        assert_eq!(read_text_arg("保证金 10 万").expect("inline"), "保证金 10 万");
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text(" \n\t").is_err());
        assert!(require_text("x").is_ok());
    }
}
