//! Collection and component selection
//!
//! Prompting goes through the `Prompter` trait so the interactive terminal
//! implementation can be swapped for scripted answers.

use crate::options::Options;
use anyhow::Result;
use std::path::Path;

/// Label of the leading "select all" item in the component prompt
pub const SELECT_ALL_LABEL: &str = "Todos os componentes";

/// Present choices to the user and receive a selection
///
/// `None` means the user dismissed the prompt.
pub trait Prompter {
    /// Pick one item; returns its index
    fn select(&mut self, message: &str, items: &[String]) -> Result<Option<usize>>;

    /// Pick any number of items; returns their indices
    fn multiselect(
        &mut self,
        message: &str,
        items: &[String],
        initially_selected: bool,
    ) -> Result<Option<Vec<usize>>>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<Option<bool>>;
}

/// Resolve the collection, prompting unless `--collection` was given
pub fn choose_collection<P: Prompter + ?Sized>(
    prompter: &mut P,
    options: &Options,
    collections: &[String],
) -> Result<Option<String>> {
    if let Some(name) = options.collection() {
        if !collections.iter().any(|c| c == name) {
            anyhow::bail!(
                "Pasta '{}' não encontrada. Pastas disponíveis: {}",
                name,
                collections.join(", ")
            );
        }
        return Ok(Some(name.to_string()));
    }

    let picked = prompter.select("Qual pasta você gostaria de copiar?", collections)?;
    Ok(picked.and_then(|idx| collections.get(idx).cloned()))
}

/// Resolve the components to copy
///
/// Explicit names are returned verbatim; existence is checked when copying.
pub fn choose_components<P: Prompter + ?Sized>(
    prompter: &mut P,
    options: &Options,
    available: &[String],
) -> Result<Vec<String>> {
    if !options.components().is_empty() {
        return Ok(options.components().to_vec());
    }

    if options.all() {
        return Ok(available.to_vec());
    }

    if available.is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::with_capacity(available.len() + 1);
    items.push(SELECT_ALL_LABEL.to_string());
    items.extend(available.iter().cloned());

    let picked = prompter
        .multiselect(
            "Quais componentes você gostaria de adicionar?",
            &items,
            options.all(),
        )?
        .unwrap_or_default();

    if picked.contains(&0) {
        return Ok(available.to_vec());
    }

    Ok(picked
        .into_iter()
        .filter_map(|idx| available.get(idx.checked_sub(1)?).cloned())
        .collect())
}

/// Ask before overwriting files unless `--yes` was given
pub fn confirm_overwrite<P: Prompter + ?Sized>(
    prompter: &mut P,
    options: &Options,
    destination: &Path,
) -> Result<bool> {
    if !options.overwrite() || options.yes() {
        return Ok(true);
    }

    let answer = prompter.confirm(
        &format!(
            "Arquivos existentes em {} serão sobrescritos. Continuar?",
            destination.display()
        ),
        false,
    )?;
    Ok(answer.unwrap_or(false))
}


#[cfg(test)]
mod tests {
    use super::scripted::{Answer, ScriptedPrompter};
    use super::*;
    use crate::options::AddArgs;

    fn options(args: AddArgs) -> Options {
        Options::new(args, Path::new("/project")).unwrap()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_collection_still_prompts() {
        let mut prompter = ScriptedPrompter::new(vec![Answer::Select(Some(0))]);
        let picked =
            choose_collection(&mut prompter, &options(AddArgs::default()), &names(&["ui"])).unwrap();
        assert_eq!(picked.as_deref(), Some("ui"));
        assert_eq!(prompter.prompts.len(), 1);
    }

    #[test]
    fn test_dismissed_collection_prompt() {
        let mut prompter = ScriptedPrompter::new(vec![Answer::Select(None)]);
        let picked = choose_collection(
            &mut prompter,
            &options(AddArgs::default()),
            &names(&["ui", "hooks"]),
        )
        .unwrap();
        assert!(picked.is_none());
    }

    #[test]
    fn test_collection_flag_skips_prompt() {
        let mut prompter = ScriptedPrompter::default();
        let opts = options(AddArgs {
            collection: Some("hooks".into()),
            ..Default::default()
        });
        let picked = choose_collection(&mut prompter, &opts, &names(&["ui", "hooks"])).unwrap();
        assert_eq!(picked.as_deref(), Some("hooks"));
        assert!(prompter.prompts.is_empty());
    }

    #[test]
    fn test_unknown_collection_flag_errors() {
        let mut prompter = ScriptedPrompter::default();
        let opts = options(AddArgs {
            collection: Some("forms".into()),
            ..Default::default()
        });
        let err = choose_collection(&mut prompter, &opts, &names(&["ui", "hooks"])).unwrap_err();
        assert!(err.to_string().contains("ui, hooks"));
    }

    #[test]
    fn test_explicit_components_bypass_prompt_verbatim() {
        let mut prompter = ScriptedPrompter::default();
        let opts = options(AddArgs {
            components: names(&["tooltip", "button"]),
            ..Default::default()
        });
        let picked = choose_components(&mut prompter, &opts, &names(&["button"])).unwrap();
        assert_eq!(picked, names(&["tooltip", "button"]));
        assert!(prompter.prompts.is_empty());
    }

    #[test]
    fn test_all_flag_returns_everything_without_prompt() {
        let mut prompter = ScriptedPrompter::default();
        let opts = options(AddArgs {
            all: true,
            ..Default::default()
        });
        let available = names(&["button", "card"]);
        assert_eq!(
            choose_components(&mut prompter, &opts, &available).unwrap(),
            available
        );
    }

    #[test]
    fn test_multiselect_maps_indices_past_select_all() {
        let mut prompter = ScriptedPrompter::new(vec![Answer::Multi(Some(vec![2]))]);
        let available = names(&["button", "card", "dialog"]);
        let picked =
            choose_components(&mut prompter, &options(AddArgs::default()), &available).unwrap();
        assert_eq!(picked, names(&["card"]));
        assert_eq!(prompter.prompts[0].1[0], SELECT_ALL_LABEL);
    }

    #[test]
    fn test_select_all_item() {
        let mut prompter = ScriptedPrompter::new(vec![Answer::Multi(Some(vec![0, 1]))]);
        let available = names(&["button", "card"]);
        let picked =
            choose_components(&mut prompter, &options(AddArgs::default()), &available).unwrap();
        assert_eq!(picked, available);
    }

    #[test]
    fn test_empty_or_dismissed_multiselect() {
        let available = names(&["button"]);
        for answer in [Answer::Multi(Some(vec![])), Answer::Multi(None)] {
            let mut prompter = ScriptedPrompter::new(vec![answer]);
            let picked =
                choose_components(&mut prompter, &options(AddArgs::default()), &available).unwrap();
            assert!(picked.is_empty());
        }
    }

    #[test]
    fn test_confirm_overwrite() {
        let dest = Path::new("/project");

        // No overwrite: nothing to confirm
        let mut prompter = ScriptedPrompter::default();
        assert!(confirm_overwrite(&mut prompter, &options(AddArgs::default()), dest).unwrap());

        // --overwrite --yes: no prompt
        let opts = options(AddArgs {
            overwrite: true,
            yes: true,
            ..Default::default()
        });
        assert!(confirm_overwrite(&mut prompter, &opts, dest).unwrap());
        assert!(prompter.prompts.is_empty());

        // --overwrite alone asks, dismissal means no
        let opts = options(AddArgs {
            overwrite: true,
            ..Default::default()
        });
        let mut prompter = ScriptedPrompter::new(vec![Answer::Confirm(None)]);
        assert!(!confirm_overwrite(&mut prompter, &opts, dest).unwrap());
        let mut prompter = ScriptedPrompter::new(vec![Answer::Confirm(Some(true))]);
        assert!(confirm_overwrite(&mut prompter, &opts, dest).unwrap());
    }
}
