use nutri_core::analysis::{ProductAnalysis, ProductComparison, Side};
use nutri_core::classify::{ClassificationSummary, IngredientEntry, IngredientTag, SummaryGroup};
use nutri_core::model::Nutrient;
use nutri_core::BarcodeAnalysis;

pub fn print_lookup(result: &BarcodeAnalysis) {
    match result {
        BarcodeAnalysis::Found { source, analysis } => print_analysis(analysis, Some(source)),
        BarcodeAnalysis::NotFound { barcode, tried } => {
            println!("Product {barcode} was not found.");
            println!("  Sources tried: {}", tried.join(", "));
        }
    }
}

pub fn print_analysis(analysis: &ProductAnalysis, source: Option<&str>) {
    println!("=== {} ===\n", analysis.name);
    println!("  Barcode:  {}", analysis.barcode);
    if let Some(ref brands) = analysis.brands {
        println!("  Brands:   {}", brands);
    }
    if let Some(ref quantity) = analysis.quantity {
        println!("  Quantity: {}", quantity);
    }
    if let Some(ref image_url) = analysis.image_url {
        println!("  Image:    {}", image_url);
    }
    if let Some(source) = source {
        println!("  Source:   {}", source);
    }
    println!();

    let g = &analysis.grade;
    println!(
        "  Grade: {} ({})  Score: {}/100  [{}]\n",
        g.grade, g.display_hint, g.rounded_score, g.scoring_name
    );

    println!("  Nutrients per 100 g:");
    for nutrient in Nutrient::ALL {
        let amount = analysis.nutrients.get(nutrient).normalize().to_string();
        let level = g
            .levels
            .iter()
            .find(|r| r.nutrient == nutrient)
            .map(|r| format!("  ({})", r.level))
            .unwrap_or_default();
        println!(
            "    {:<14} {:>8} {:<4}{}",
            nutrient.to_string(),
            amount,
            nutrient.unit(),
            level
        );
    }
    println!();

    print_bullets("Good", &g.good_aspects);
    print_bullets("Concerns", &g.concerns);

    if analysis.ingredients.is_empty() {
        println!("  No ingredient list available.\n");
    } else {
        print_ingredients(&analysis.ingredients, false);
        print_summary(&analysis.summary);
    }
}

fn print_bullets(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {title}:");
    for item in items {
        println!("    - {item}");
    }
    println!();
}

pub fn print_ingredients(entries: &[IngredientEntry], verbose: bool) {
    let width = entries.iter().map(|e| e.text.len()).max().unwrap_or(10);
    println!("  Ingredients:");
    for entry in entries {
        let marker = match entry.tag {
            IngredientTag::Concerning => "!",
            IngredientTag::Beneficial => "+",
            IngredientTag::Neutral => " ",
        };
        println!(
            "    {} {:<width$}  {}",
            marker,
            entry.text,
            entry.tag,
            width = width
        );
        if verbose || entry.tag != IngredientTag::Neutral {
            println!("        {}", entry.reason);
        }
    }
    println!();
}

pub fn print_summary(summary: &ClassificationSummary) {
    if summary.is_empty() {
        println!("  No concerning or beneficial ingredients detected.\n");
        return;
    }
    print_groups("Watch out for", &summary.concerning);
    print_groups("Good to see", &summary.beneficial);
}

fn print_groups(title: &str, groups: &[SummaryGroup]) {
    if groups.is_empty() {
        return;
    }
    println!("  {title}:");
    for group in groups {
        println!("    {} ({})", group.reason, group.examples.join(", "));
    }
    println!();
}

pub fn print_comparison(cmp: &ProductComparison) {
    let (l, r) = (&cmp.left, &cmp.right);
    let width = l.name.len().max(r.name.len()).max(14);

    println!("{:<16} {:>w$}  {:>w$}  {:>10}", "", l.name, r.name, "Difference", w = width);
    println!("{}", "-".repeat(16 + 2 * width + 16));
    println!(
        "{:<16} {:>w$}  {:>w$}",
        "Grade",
        format!("{} ({})", l.grade.grade, l.grade.rounded_score),
        format!("{} ({})", r.grade.grade, r.grade.rounded_score),
        w = width
    );
    for delta in &cmp.deltas {
        let sign = if delta.difference.is_sign_positive() && !delta.difference.is_zero() {
            "+"
        } else {
            ""
        };
        println!(
            "{:<16} {:>w$}  {:>w$}  {:>10}",
            format!("{} ({})", delta.nutrient, delta.nutrient.unit()),
            delta.left.normalize().to_string(),
            delta.right.normalize().to_string(),
            format!("{}{}", sign, delta.difference.normalize()),
            w = width
        );
    }
    println!();

    match cmp.better {
        Some(Side::Left) => println!("{} scores higher.", l.name),
        Some(Side::Right) => println!("{} scores higher.", r.name),
        None => println!("Both products score the same."),
    }
}
