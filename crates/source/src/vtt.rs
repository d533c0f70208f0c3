//! WebVTT subtitle parsing

use crate::postprocess::strip_markup;
use crate::types::Cue;

/// Parse WebVTT content into cues
///
/// Header, NOTE, STYLE and REGION blocks are skipped, as are cue identifiers
/// and cue settings. Blocks whose timing line cannot be read are dropped.
pub fn parse_vtt(content: &str) -> Vec<Cue> {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut cues = Vec::new();

    for block in content.split("\n\n") {
        let mut lines = block.lines().skip_while(|line| !line.contains("-->"));

        let Some(timing) = lines.next() else {
            continue;
        };
        let Some((start, end)) = parse_timing(timing) else {
            continue;
        };

        let text: Vec<String> = lines
            .map(|line| strip_markup(line).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        if !text.is_empty() {
            cues.push(Cue { start, end, lines: text });
        }
    }

    cues
}

/// `00:00:01.000 --> 00:00:04.000 align:start position:0%`
fn parse_timing(line: &str) -> Option<(f32, f32)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    Some((parse_timestamp(start.trim())?, parse_timestamp(end)?))
}

/// `HH:MM:SS.mmm` or `MM:SS.mmm` to seconds
fn parse_timestamp(value: &str) -> Option<f32> {
    let parts: Vec<&str> = value.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, s] => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?, *s),
        [m, s] => (0, m.parse::<u32>().ok()?, *s),
        _ => return None,
    };
    let seconds: f32 = seconds.replace(',', ".").parse().ok()?;
    Some((hours * 3600 + minutes * 60) as f32 + seconds)
}
