use nutri_core::error::NutriError;
use nutri_core::rules::builtin;
use nutri_core::rules::schema::{KeywordRuleDef, ScoringProfileDef};
use std::path::Path;

pub fn list() -> Result<(), NutriError> {
    println!("Scoring presets:\n");
    for name in builtin::SCORING_PRESETS {
        let profile = builtin::load_scoring_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_SCORING {
            " (default)"
        } else {
            ""
        };
        println!("  {:<10} {} (v{}){}", name, profile.name, profile.version, default_marker);
        if let Some(ref desc) = profile.description {
            println!("             {}", desc);
        }
        println!();
    }

    let table = builtin::load_keyword_table()?;
    println!("Ingredient table:\n");
    println!(
        "  {:<10} {} (v{}): {} concerning, {} beneficial keywords",
        "keywords",
        table.name,
        table.version,
        table.concerning.len(),
        table.beneficial.len()
    );
    println!();
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), NutriError> {
    if preset == "keywords" {
        return explain_keywords();
    }

    let profile = builtin::load_scoring_preset(preset)?;
    explain_scoring(&profile);
    Ok(())
}

fn explain_scoring(profile: &ScoringProfileDef) {
    println!("{} (version {})\n", profile.name, profile.version);
    if let Some(ref desc) = profile.description {
        println!("{}\n", desc);
    }

    let w = &profile.weights;
    println!("Score per 100 g, clamped to 0-100:\n");
    println!("  100");
    println!("    - {} x sugar", w.sugar);
    println!("    - {} x saturated fat", w.saturated_fat);
    println!("    - {} x salt", w.salt);
    println!("    - {} x fat", w.fat);
    println!("    + {} x protein", w.protein);
    if !w.fiber.is_zero() {
        println!("    + {} x fiber", w.fiber);
    }
    println!();

    println!("Grades (decided on the exact score):\n");
    for band in &profile.bands {
        println!(
            "  {}  score >= {:<4} {}",
            band.grade,
            band.min_score.to_string(),
            band.grade.display_hint()
        );
    }
    println!(
        "  {}  below {:<5} {}",
        profile.floor_grade,
        profile
            .bands
            .last()
            .map(|b| b.min_score.to_string())
            .unwrap_or_default(),
        profile.floor_grade.display_hint()
    );
    println!();
}

fn explain_keywords() -> Result<(), NutriError> {
    let table = builtin::load_keyword_table()?;
    println!("{} (version {})\n", table.name, table.version);
    if let Some(ref desc) = table.description {
        println!("{}\n", desc);
    }

    println!("Concerning keywords, checked first:\n");
    print_keyword_rules(&table.concerning);
    println!("Beneficial keywords:\n");
    print_keyword_rules(&table.beneficial);
    println!("Anything else: {}\n", table.neutral_reason);
    Ok(())
}

fn print_keyword_rules(rules: &[KeywordRuleDef]) {
    let width = rules.iter().map(|r| r.keyword.len()).max().unwrap_or(10);
    for rule in rules {
        println!("  {:<width$}  {}", rule.keyword, rule.reason, width = width);
    }
    println!();
}

pub fn schema() -> Result<(), NutriError> {
    print!(
        r#"JSON Rule Schemas
=================

Scoring profile (`nutri rules validate FILE`, or `--scoring FILE.json`):

  name          (string, required)  Human-readable name
  description   (string, optional)  What the profile is for
  version       (string, required)  Version identifier (e.g., "2025.1")
  weights       (object, required)  Per-100 g weights: sugar, saturated_fat,
                                    salt, fat, protein, fiber (optional,
                                    default "0"). All non-negative.
  bands         (array, required)   Grade bands from best to worst, each
                                    {{"grade": "A", "min_score": "85"}}.
                                    min_score strictly decreasing, 0-100.
  floor_grade   (string, required)  Grade below the last band.

Keyword table (`nutri rules validate FILE --kind keywords`):

  name, description, version   as above
  concerning    (array)  Ordered {{"keyword": "...", "reason": "..."}} rules,
                         checked before beneficial rules
  beneficial    (array)  Ordered rules of the same shape
  neutral_reason (string, optional) Reason for unmatched ingredients

Keywords are lower-case substrings; the first matching rule wins.

Note: weights and scores must be quoted strings, not bare numbers,
to preserve exact decimal precision (e.g., "1.5" not 1.5).
"#
    );
    Ok(())
}

pub fn validate(file: &Path, kind: &str) -> Result<(), NutriError> {
    match kind {
        "scoring" => {
            let profile = nutri_core::rules::load_scoring(file)?;
            println!("Scoring profile '{}' (v{}) is valid.", profile.name, profile.version);
            let grades: Vec<String> = profile.bands.iter().map(|b| b.grade.to_string()).collect();
            println!("  Bands: {} (floor {})", grades.join(", "), profile.floor_grade);
        }
        "keywords" => {
            let table = nutri_core::rules::load_keywords(file)?;
            println!("Keyword table '{}' (v{}) is valid.", table.name, table.version);
            println!(
                "  Rules: {} concerning, {} beneficial",
                table.concerning.len(),
                table.beneficial.len()
            );

            // Later rules shadowed by an earlier, shorter keyword never match.
            let mut warnings = Vec::new();
            for rules in [&table.concerning, &table.beneficial] {
                for (i, later) in rules.iter().enumerate() {
                    if let Some(earlier) = rules[..i]
                        .iter()
                        .find(|e| later.keyword.contains(e.keyword.as_str()))
                    {
                        warnings.push(format!(
                            "'{}' is shadowed by earlier keyword '{}'",
                            later.keyword, earlier.keyword
                        ));
                    }
                }
            }
            if !warnings.is_empty() {
                println!("\nWarnings:");
                for w in &warnings {
                    println!("  - {}", w);
                }
            }
        }
        other => {
            return Err(NutriError::validation(
                "kind",
                format!("unknown rule kind '{}', expected scoring or keywords", other),
            ))
        }
    }
    Ok(())
}
