//! Turns free-form generated text into a fixed-size playlist.
//!
//! Parsing never fails: lines that don't look like `Title - Artist` are
//! dropped and a short result is padded with placeholder entries.

use crate::models::SongEntry;
use rand::Rng;
use rand::seq::index;

const SEPARATOR: &str = " - ";
const PLACEHOLDER_VALUES: &[&str] = &["unknown song", "unknown artist"];
const QUOTES: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '`'];

/// Parse `raw` into exactly `n` entries, sampling with the thread-local RNG.
pub fn parse_playlist(raw: &str, genre: &str, n: usize) -> Vec<SongEntry> {
    parse_playlist_with_rng(raw, genre, n, &mut rand::thread_rng())
}

/// Same as [`parse_playlist`] with an explicit random source.
pub fn parse_playlist_with_rng<R: Rng + ?Sized>(
    raw: &str,
    genre: &str,
    n: usize,
    rng: &mut R,
) -> Vec<SongEntry> {
    let candidates = parse_candidates(raw);
    select_playlist(candidates, genre, n, rng)
}

/// Every line of `raw` that normalizes to a usable entry, in source order.
pub fn parse_candidates(raw: &str) -> Vec<SongEntry> {
    raw.lines().filter_map(parse_line).collect()
}

/// Cut or pad `candidates` to exactly `n` entries.
pub fn select_playlist<R: Rng + ?Sized>(
    mut candidates: Vec<SongEntry>,
    genre: &str,
    n: usize,
    rng: &mut R,
) -> Vec<SongEntry> {
    if candidates.is_empty() {
        tracing::debug!(genre = %genre, "No songs parsed from generated text, returning placeholders");
        return (1..=n).map(|i| SongEntry::placeholder(genre, i)).collect();
    }

    if candidates.len() > n {
        let mut picked = index::sample(rng, candidates.len(), n).into_vec();
        picked.sort_unstable();

        let mut slots: Vec<Option<SongEntry>> = candidates.into_iter().map(Some).collect();
        return picked
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
    }

    if candidates.len() < n {
        tracing::debug!(
            genre = %genre,
            parsed = candidates.len(),
            wanted = n,
            "Fewer songs than requested, filling missing slots"
        );
        let first_missing = candidates.len() + 1;
        candidates.extend((first_missing..=n).map(|i| SongEntry::placeholder(genre, i)));
    }

    candidates
}

fn parse_line(line: &str) -> Option<SongEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // doubled numbering like "1. 1) Song - Artist" shows up now and then
    let line = strip_enumeration(strip_enumeration(line));
    let line = line.strip_prefix("- ").unwrap_or(line);

    let (title, artist) = line.split_once(SEPARATOR)?;
    let title = clean_field(title);
    let artist = truncate_annotation(clean_field(artist));

    if title.is_empty() || artist.is_empty() {
        return None;
    }
    if is_placeholder_value(title) || is_placeholder_value(artist) {
        return None;
    }

    Some(SongEntry::new(title, artist))
}

fn is_placeholder_value(field: &str) -> bool {
    PLACEHOLDER_VALUES.iter().any(|v| field.eq_ignore_ascii_case(v))
}

// "12. ", "3)", "4: " -> rest of the line
fn strip_enumeration(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return line;
    }
    match line[digits..].strip_prefix(['.', ')', ':']) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

fn clean_field(field: &str) -> &str {
    field.trim().trim_matches(QUOTES).trim()
}

// "Queen : Greatest Hits" -> "Queen", but "Jay-Z" and "AC/DC" stay whole
fn truncate_annotation(artist: &str) -> &str {
    let bytes = artist.as_bytes();
    for (i, b) in bytes.iter().enumerate().skip(1) {
        if matches!(b, b':' | b'-' | b'/') && bytes[i - 1] == b' ' {
            return clean_field(&artist[..i]);
        }
    }
    artist
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn numbered(count: usize) -> String {
        (1..=count)
            .map(|i| format!("{}. Song {} - Artist {}", i, i, i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn always_returns_exactly_n() {
        for count in [0, 1, 4, 5, 6, 20] {
            let raw = numbered(count);
            assert_eq!(parse_playlist(&raw, "jazz", 5).len(), 5, "count {}", count);
        }
    }

    #[test]
    fn two_songs_are_padded_with_three_placeholders() {
        let raw = "1. Imagine - John Lennon\n2. Bohemian Rhapsody - Queen";
        let playlist = parse_playlist(raw, "rock", 5);

        assert_eq!(playlist.len(), 5);
        assert_eq!(playlist[0], SongEntry::new("Imagine", "John Lennon"));
        assert_eq!(playlist[1], SongEntry::new("Bohemian Rhapsody", "Queen"));
        assert!(playlist[2..].iter().all(SongEntry::is_placeholder));
        assert_eq!(playlist[2].title, "Unknown rock Song #3");
    }

    #[test]
    fn empty_text_gives_all_placeholders() {
        let playlist = parse_playlist("", "afrobeats", 5);
        assert_eq!(playlist.len(), 5);
        assert!(playlist.iter().all(SongEntry::is_placeholder));
        assert_eq!(playlist[0].title, "Unknown afrobeats Song #1");
        assert_eq!(playlist[4].title, "Unknown afrobeats Song #5");
    }

    #[test]
    fn garbage_text_does_not_panic() {
        let raw = "Sure! Here are some songs:\n\n---\n - \n1.\n\"\" - \"\"\n:::";
        let playlist = parse_playlist(raw, "", 5);
        assert!(playlist.iter().all(SongEntry::is_placeholder));
        assert_eq!(playlist[0].title, "Unknown Song #1");
    }

    #[test]
    fn lines_without_separator_are_excluded() {
        let raw = "Here you go\nHey Jude by The Beatles\nYesterday-The Beatles\nLet It Be - The Beatles";
        assert_eq!(
            parse_candidates(raw),
            vec![SongEntry::new("Let It Be", "The Beatles")]
        );
    }

    #[test]
    fn enumeration_markers_are_stripped() {
        let raw = "1. One - A\n2) Two - B\n3: Three - C\n4.Four - D\n1. 1) Five - E";
        let titles: Vec<_> = parse_candidates(raw).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, ["One", "Two", "Three", "Four", "Five"]);
    }

    #[test]
    fn bullets_and_quotes_are_stripped() {
        let raw = "- \"Halo\" - Beyonce\n1. - 'Hurt' - \u{201C}Johnny Cash\u{201D}";
        assert_eq!(
            parse_candidates(raw),
            vec![
                SongEntry::new("Halo", "Beyonce"),
                SongEntry::new("Hurt", "Johnny Cash"),
            ]
        );
    }

    #[test]
    fn numbers_that_are_not_markers_stay() {
        let raw = "1999 - Prince\n99 Luftballons - Nena";
        let titles: Vec<_> = parse_candidates(raw).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, ["1999", "99 Luftballons"]);
    }

    #[test]
    fn artist_annotation_is_truncated_but_title_is_not() {
        let raw = "Killer Queen: Live - Queen : Greatest Hits\nThunderstruck - AC/DC\nEmpire State of Mind - Jay-Z - The Blueprint 3\nA/B - X / Y";
        assert_eq!(
            parse_candidates(raw),
            vec![
                SongEntry::new("Killer Queen: Live", "Queen"),
                SongEntry::new("Thunderstruck", "AC/DC"),
                SongEntry::new("Empire State of Mind", "Jay-Z"),
                SongEntry::new("A/B", "X"),
            ]
        );
    }

    #[test]
    fn only_first_separator_splits() {
        let raw = "Song - Artist-Name Band";
        assert_eq!(
            parse_candidates(raw),
            vec![SongEntry::new("Song", "Artist-Name Band")]
        );
    }

    #[test]
    fn placeholders_from_a_previous_pass_are_dropped() {
        let raw = "Unknown Song - Somebody\nReal Song - Unknown Artist\nunknown jazz song #3 - UNKNOWN ARTIST\nKeep - Me";
        assert_eq!(parse_candidates(raw), vec![SongEntry::new("Keep", "Me")]);
    }

    #[test]
    fn placeholder_values_are_dropped_in_either_field() {
        let raw = "Unknown Artist - Unknown Song\nUnknown Artist - Someone\nSomething - unknown song\nKeep - Me";
        assert_eq!(parse_candidates(raw), vec![SongEntry::new("Keep", "Me")]);
    }

    #[test]
    fn empty_fields_are_dropped() {
        let raw = " - Artist\nTitle - \n\"\" - Artist\nTitle - ''";
        assert!(parse_candidates(raw).is_empty());
    }

    #[test]
    fn exact_count_is_returned_unchanged() {
        let raw = numbered(5);
        let first = parse_playlist_with_rng(&raw, "pop", 5, &mut StdRng::seed_from_u64(1));
        let second = parse_playlist_with_rng(&raw, "pop", 5, &mut StdRng::seed_from_u64(2));
        assert_eq!(first, second);
        assert_eq!(first, parse_candidates(&raw));
    }

    #[test]
    fn short_input_is_deterministic() {
        let raw = numbered(3);
        assert_eq!(parse_playlist(&raw, "pop", 5), parse_playlist(&raw, "pop", 5));
    }

    #[test]
    fn oversupply_is_sampled_without_duplicates_in_source_order() {
        let raw = numbered(12);
        let playlist = parse_playlist_with_rng(&raw, "pop", 5, &mut rng());
        assert_eq!(playlist.len(), 5);

        let titles: HashSet<_> = playlist.iter().map(|s| s.title.clone()).collect();
        assert_eq!(titles.len(), 5);

        let positions: Vec<usize> = playlist
            .iter()
            .map(|s| s.title.trim_start_matches("Song ").parse().unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn oversupply_selection_varies() {
        let raw = numbered(10);
        let mut rng = rng();
        let distinct: HashSet<Vec<SongEntry>> = (0..50)
            .map(|_| parse_playlist_with_rng(&raw, "pop", 5, &mut rng))
            .collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn sampling_does_not_favour_early_lines() {
        let raw = numbered(10);
        let mut rng = rng();
        let mut hits = [0usize; 10];
        for _ in 0..4000 {
            for song in parse_playlist_with_rng(&raw, "pop", 5, &mut rng) {
                let i: usize = song.title.trim_start_matches("Song ").parse().unwrap();
                hits[i - 1] += 1;
            }
        }
        // expected 2000 each
        assert!(hits.iter().all(|&h| (1800..=2200).contains(&h)), "{:?}", hits);
    }
}
