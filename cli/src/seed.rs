use anyhow::{bail, Context, Result};
use cuisine_core::{can_create, RecipeDraft};

use crate::commands::Session;

struct SeedRecipe {
    title: &'static str,
    description: &'static str,
    instructions: &'static str,
    ingredients: &'static [&'static str],
    category: &'static str,
    cooking_time: Option<u32>,
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Pâtes carbonara",
        description: "Un classique italien simple et délicieux",
        instructions: "1. Cuire les pâtes al dente.
2. Faire revenir les lardons.
3. Mélanger les oeufs et le parmesan.
4. Hors du feu, mélanger les pâtes, les lardons et la crème aux oeufs.",
        ingredients: &["Pâtes", "Lardons", "Crème fraîche", "Oeufs", "Parmesan"],
        category: "Plat principal",
        cooking_time: Some(20),
    },
    SeedRecipe {
        title: "Tarte aux pommes",
        description: "La tarte de grand-mère, croustillante et fondante",
        instructions: "1. Étaler la pâte dans un moule.
2. Disposer les pommes en rosace.
3. Saupoudrer de sucre et cuire 35 minutes à 180°C.",
        ingredients: &["Pâte brisée", "Pommes", "Sucre", "Beurre"],
        category: "Dessert",
        cooking_time: Some(45),
    },
    SeedRecipe {
        title: "Soupe à l'oignon",
        description: "Gratinée, comme dans les bistrots parisiens",
        instructions: "1. Caraméliser les oignons.
2. Mouiller au bouillon et laisser mijoter.
3. Servir avec du pain grillé et du fromage gratiné.",
        ingredients: &["Oignons", "Bouillon de boeuf", "Pain", "Gruyère"],
        category: "Entrée",
        cooking_time: Some(60),
    },
    SeedRecipe {
        title: "Citronnade",
        description: "Fraîche et acidulée",
        instructions: "Presser les citrons, ajouter le sucre et l'eau froide.",
        ingredients: &["Citrons", "Sucre", "Eau", "Menthe"],
        category: "Boisson",
        cooking_time: None,
    },
];

pub async fn seed(session: &Session) -> Result<()> {
    if !can_create(&session.user, session.write_policy) {
        bail!("User '{}' may not create recipes", session.user.username);
    }

    // Skip titles this user already has so seeding twice is harmless
    let existing = session
        .store
        .list_recipes()
        .await
        .context("Failed to list existing recipes")?;
    if existing.is_stale() {
        bail!("Recipe service is unreachable, not seeding");
    }

    println!("Creating {} sample recipes...", SAMPLE_RECIPES.len());

    for recipe in SAMPLE_RECIPES {
        let already_there = existing
            .recipes
            .iter()
            .any(|r| r.title == recipe.title && r.author == session.user.username);
        if already_there {
            println!("  Skipped (exists): {}", recipe.title);
            continue;
        }

        let draft = RecipeDraft {
            title: recipe.title.to_string(),
            description: recipe.description.to_string(),
            instructions: recipe.instructions.to_string(),
            ingredients: recipe.ingredients.iter().map(|i| i.to_string()).collect(),
            category: recipe.category.to_string(),
            cooking_time: recipe.cooking_time,
            image: None,
            author: session.user.username.clone(),
        };

        let created = session
            .store
            .create_recipe(draft)
            .await
            .with_context(|| format!("Failed to create recipe: {}", recipe.title))?;

        println!("  Created: {} ({})", created.title, created.id);
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("SEED DATA COMPLETE");
    println!("{}", "=".repeat(50));
    println!("Author: {}", session.user.username);
    println!("{}", "=".repeat(50));

    Ok(())
}
