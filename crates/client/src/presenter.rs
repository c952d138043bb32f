//! Text presenter.

use descent_core::{Frame, FrameSink};

/// Prints new battle log lines at `info` and a compact frame layout at
/// `debug`.
#[derive(Debug, Default)]
pub struct LogSink {
    last_log: Vec<String>,
    frames: u64,
}

impl LogSink {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Lines in `log` that were not in the previous frame's tail.
    fn fresh<'a>(&self, log: &'a [String]) -> &'a [String] {
        let max = self.last_log.len().min(log.len());
        let overlap = (0..=max)
            .rev()
            .find(|&k| self.last_log[self.last_log.len() - k..] == log[..k])
            .unwrap_or(0);
        &log[overlap..]
    }
}

impl FrameSink for LogSink {
    fn render(&mut self, frame: &Frame) {
        self.frames += 1;
        for line in self.fresh(&frame.log) {
            tracing::info!(room = frame.room, "{line}");
        }
        self.last_log = frame.log.clone();

        if tracing::enabled!(tracing::Level::DEBUG) {
            for line in layout(frame) {
                tracing::debug!("{line}");
            }
        }
    }
}

/// One text line per row plus a header.
pub fn layout(frame: &Frame) -> Vec<String> {
    let player = &frame.player;
    let mut lines = vec![format!(
        "room {} | t={:.2}s | lv {} ({}/{} xp) | {} gold | shop {:.0}% boss {:.0}%",
        frame.room,
        frame.clock,
        player.level,
        player.xp,
        player.xp_to_next,
        player.gold,
        frame.shop_probability * 100.0,
        frame.boss_probability * 100.0,
    )];

    let mut rows = vec![format!(
        "@ Player {:.1}/{:.1}",
        player.hp, player.stats.max_hp
    )];
    for enemy in &frame.enemies {
        let state = if !enemy.alive {
            " (dead)"
        } else if enemy.stunned {
            " (stunned)"
        } else {
            ""
        };
        rows.push(format!(
            "{} {} {:.1}/{:.1}{state}",
            enemy.glyph, enemy.name, enemy.hp, enemy.max_hp
        ));
    }
    for overlay in &frame.overlays {
        if let Some(row) = rows.get_mut(overlay.row) {
            row.push_str("  ");
            row.push_str(&overlay.text);
        }
    }
    lines.extend(rows);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fresh_skips_lines_already_shown() {
        let mut sink = LogSink::default();
        assert_eq!(sink.fresh(&lines(&["a", "b"])), lines(&["a", "b"]).as_slice());

        sink.last_log = lines(&["a", "b", "c"]);
        assert_eq!(sink.fresh(&lines(&["b", "c", "d"])), lines(&["d"]).as_slice());
        assert!(sink.fresh(&lines(&["a", "b", "c"])).is_empty());
        assert_eq!(sink.fresh(&lines(&["x"])), lines(&["x"]).as_slice());
    }
}
