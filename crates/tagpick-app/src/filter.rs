/// Shown in place of the option list when the active filter matches
/// nothing in the universe.
pub const NO_MATCH_PLACEHOLDER: &str =
    "No tags match your search. Press Enter to add a new tag.";

/// One entry of the filtered option list. `pending` marks tags the user
/// created in this session that have not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleOption {
    pub text: String,
    pub pending: bool,
}

/// Computes the option list for the current filter. The universe is the
/// fetched vocabulary followed by session-created tags not already in it,
/// matched case-insensitively as a substring.
pub fn visible_options(
    vocabulary: &[String],
    pending: &[String],
    filter: &str,
) -> Vec<VisibleOption> {
    let needle = filter.trim().to_lowercase();

    let mut options = Vec::<VisibleOption>::new();
    for text in vocabulary {
        push_if_matching(&mut options, text, false, &needle);
    }
    for text in pending {
        if vocabulary.contains(text) {
            continue;
        }
        push_if_matching(&mut options, text, true, &needle);
    }

    options
}

fn push_if_matching(
    options: &mut Vec<VisibleOption>,
    text: &str,
    pending: bool,
    needle: &str,
) {
    if !needle.is_empty() && !text.to_lowercase().contains(needle) {
        return;
    }
    if options.iter().any(|option| option.text == text) {
        return;
    }
    options.push(VisibleOption {
        text: text.to_string(),
        pending,
    });
}
