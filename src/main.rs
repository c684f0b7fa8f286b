use log::{debug, error};
use std::env;

use recipe_nutrition::{
    open_editor, AddResponse, AppConfig, AppError, FileStore, KeyValueStore, Lookup,
    MacroTotals, NewIngredient, NutritionClient, NutritionSource, RecipeEditor,
};

const USAGE: &str = "Usage: recipe-nutrition <command> [args]

Commands:
  recipes                               List saved recipes
  totals <id>                           Macro totals for a saved recipe
  delete <id>                           Delete a saved recipe
  draft                                 Print the in-progress draft
  clear-draft                           Delete the in-progress draft
  lookup <name>                         Look up nutrition for an ingredient
  remote                                List ingredients known to the service
  add <name> <carbs> <fat> <protein>    Create an ingredient on the service
  seed                                  Create the two demo ingredients";

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = args
        .first()
        .ok_or_else(|| AppError::Usage(USAGE.to_string()))?;

    let config = AppConfig::load()?;
    debug!("Loaded configuration: {:?}", config.storage);

    match (command.as_str(), &args[1..]) {
        ("recipes", []) => list_recipes(&open_editor(&config)?),
        ("totals", [id]) => show_totals(&open_editor(&config)?, id),
        ("delete", [id]) => delete(&mut open_editor(&config)?, id),
        ("draft", []) => show_draft(&open_editor(&config)?),
        ("clear-draft", []) => {
            let mut editor = open_editor(&config)?;
            editor.clear_draft();
            report(&editor)
        }
        ("lookup", [name]) => lookup(&NutritionClient::new(&config.api)?, name).await,
        ("remote", []) => {
            let mut editor = open_editor(&config)?;
            editor.list_remote().await;
            for n in editor.remote() {
                println!("{}\tcarbs {}\tfat {}\tprotein {}", n.name, n.carbs, n.fat, n.protein);
            }
            report(&editor)
        }
        ("add", [name, carbs, fat, protein]) => {
            let payload = NewIngredient::new(
                name.as_str(),
                parse_amount(carbs)?,
                parse_amount(fat)?,
                parse_amount(protein)?,
            );
            let client = NutritionClient::new(&config.api)?;
            print_add_response(&client.add_ingredient(&payload).await?);
            Ok(())
        }
        ("seed", []) => {
            let mut editor = open_editor(&config)?;
            editor.seed_two().await;
            report(&editor)
        }
        _ => Err(AppError::Usage(USAGE.to_string())),
    }
}

fn parse_amount(raw: &str) -> Result<f64, AppError> {
    raw.parse()
        .map_err(|_| AppError::Usage(format!("'{}' is not a number", raw)))
}

/// Print the editor's info message, or fail with its error message
fn report<S: KeyValueStore + 'static>(editor: &RecipeEditor<S>) -> Result<(), AppError> {
    if let Some(error) = editor.error() {
        return Err(AppError::Action(error.to_string()));
    }
    if let Some(info) = editor.info() {
        println!("{}", info);
    }
    Ok(())
}

fn print_totals(totals: &MacroTotals) {
    println!(
        "carbs {:.1}  fat {:.1}  protein {:.1}",
        totals.carbs, totals.fat, totals.protein
    );
}

fn list_recipes(editor: &RecipeEditor<FileStore>) -> Result<(), AppError> {
    if editor.recipes().is_empty() {
        println!("No saved recipes.");
    }
    for recipe in editor.recipes() {
        println!(
            "{}\t{}\t{} ingredients\t{} steps\t{}",
            recipe.id,
            recipe.title,
            recipe.ingredients.len(),
            recipe.steps.len(),
            recipe.created_at
        );
    }
    Ok(())
}

fn show_totals(editor: &RecipeEditor<FileStore>, id: &str) -> Result<(), AppError> {
    let recipe = editor
        .recipes()
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| AppError::Usage(format!("No recipe with id {}", id)))?;
    print_totals(&MacroTotals::from_ingredients(&recipe.ingredients));
    Ok(())
}

fn delete(editor: &mut RecipeEditor<FileStore>, id: &str) -> Result<(), AppError> {
    let recipe = editor
        .recipes()
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .ok_or_else(|| AppError::Usage(format!("No recipe with id {}", id)))?;
    editor.delete_recipe(&recipe);
    report(editor)
}

fn show_draft(editor: &RecipeEditor<FileStore>) -> Result<(), AppError> {
    match editor.store().read_draft() {
        Some(draft) => {
            let json = serde_json::to_string_pretty(&draft)
                .map_err(|e| AppError::Action(e.to_string()))?;
            println!("{}", json);
            print_totals(&MacroTotals::from_ingredients(&draft.ingredients));
        }
        None => println!("No draft."),
    }
    Ok(())
}

async fn lookup(client: &NutritionClient, name: &str) -> Result<(), AppError> {
    match client.search_ingredient(name).await? {
        Lookup::Found(n) => println!(
            "{}\tcarbs {}\tfat {}\tprotein {}",
            n.name, n.carbs, n.fat, n.protein
        ),
        Lookup::NotFound => println!("No nutrition found for \"{}\" (404)", name),
    }
    Ok(())
}

fn print_add_response(response: &AddResponse) {
    match response {
        AddResponse::Json(value) => println!("{}", value),
        AddResponse::Text(text) => println!("{}", text),
    }
}
