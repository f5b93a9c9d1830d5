//! Menu business logic - Handles categories, dishes and their recipes.
//!
//! Dishes are stored with their recipe rows; [`get_dish`] assembles the
//! [`Dish`](crate::core::recipe::Dish) value the checkout works with. Recipe rows may
//! reference inventory items that do not exist (or no longer exist): the sale path
//! skips those ingredients instead of failing.

use crate::{
    core::recipe::{Dish, RecipeEntry},
    entities::{category, dish, recipe_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::info;

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Dish name cannot be empty".to_string(),
        });
    }
    Ok(())
}

async fn ensure_category_exists<C>(db: &C, category_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    if let Some(id) = category_id {
        category::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(Error::CategoryNotFound { id })?;
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidAmount { amount: price });
    }
    Ok(())
}

fn validate_recipe(recipe: &[RecipeEntry]) -> Result<()> {
    for entry in recipe {
        if !entry.quantity.is_finite() || entry.quantity <= 0.0 {
            return Err(Error::InvalidAmount {
                amount: entry.quantity,
            });
        }
    }
    Ok(())
}

fn to_dish(model: dish::Model, recipe: Vec<recipe_item::Model>) -> Dish {
    Dish {
        id: model.id,
        name: model.name,
        price: model.price,
        recipe: recipe
            .into_iter()
            .map(|row| RecipeEntry::new(row.ingredient_id, row.quantity))
            .collect(),
    }
}

async fn insert_recipe<C>(db: &C, dish_id: i64, recipe: &[RecipeEntry]) -> Result<()>
where
    C: ConnectionTrait,
{
    if recipe.is_empty() {
        return Ok(());
    }
    let rows = recipe.iter().map(|entry| recipe_item::ActiveModel {
        dish_id: Set(dish_id),
        ingredient_id: Set(entry.ingredient_id),
        quantity: Set(entry.quantity),
        ..Default::default()
    });
    recipe_item::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// Creates a menu category.
///
/// # Errors
/// Returns an error if the name is empty or already taken.
pub async fn create_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config {
            message: "Category name cannot be empty".to_string(),
        });
    }

    let taken = category::Entity::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await?;
    if taken.is_some() {
        return Err(Error::Config {
            message: format!("Category '{name}' already exists"),
        });
    }

    let model = category::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(category_id = model.id, name = %model.name, "Category created.");
    Ok(model)
}

/// All categories in the order they were created.
pub async fn get_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    category::Entity::find()
        .order_by_asc(category::Column::CreatedAt)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Looks a category up by exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<category::Model>> {
    category::Entity::find()
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a dish and its recipe in one transaction.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The price is negative or not finite
/// - A recipe quantity is zero, negative or not finite
/// - `category_id` names a category that does not exist
/// - The database insert fails
pub async fn create_dish(
    db: &DatabaseConnection,
    name: String,
    description: String,
    price: f64,
    category_id: Option<i64>,
    recipe: Vec<RecipeEntry>,
) -> Result<Dish> {
    validate_name(&name)?;
    validate_price(price)?;
    validate_recipe(&recipe)?;

    let txn = db.begin().await?;
    ensure_category_exists(&txn, category_id).await?;

    let now = chrono::Utc::now().naive_utc();
    let model = dish::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description),
        price: Set(price),
        category_id: Set(category_id),
        is_available: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    insert_recipe(&txn, model.id, &recipe).await?;
    txn.commit().await?;

    info!(dish_id = model.id, ingredients = recipe.len(), "Dish created.");
    Ok(Dish {
        id: model.id,
        name: model.name,
        price: model.price,
        recipe,
    })
}

/// Loads a dish with its recipe, `None` if the dish does not exist.
pub async fn get_dish<C>(db: &C, dish_id: i64) -> Result<Option<Dish>>
where
    C: ConnectionTrait,
{
    let Some(model) = dish::Entity::find_by_id(dish_id).one(db).await? else {
        return Ok(None);
    };
    let recipe = recipe_item::Entity::find()
        .filter(recipe_item::Column::DishId.eq(dish_id))
        .order_by_asc(recipe_item::Column::Id)
        .all(db)
        .await?;
    Ok(Some(to_dish(model, recipe)))
}

/// Retrieves the raw dish row, including description and availability.
pub async fn get_dish_model(
    db: &DatabaseConnection,
    dish_id: i64,
) -> Result<Option<dish::Model>> {
    dish::Entity::find_by_id(dish_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All dishes currently marked available, with recipes, ordered by name.
pub async fn get_available_dishes(db: &DatabaseConnection) -> Result<Vec<Dish>> {
    let dishes = dish::Entity::find()
        .filter(dish::Column::IsAvailable.eq(true))
        .order_by_asc(dish::Column::Name)
        .all(db)
        .await?;

    let ids: Vec<i64> = dishes.iter().map(|d| d.id).collect();
    let mut recipes: HashMap<i64, Vec<recipe_item::Model>> = HashMap::new();
    for row in recipe_item::Entity::find()
        .filter(recipe_item::Column::DishId.is_in(ids))
        .order_by_asc(recipe_item::Column::Id)
        .all(db)
        .await?
    {
        recipes.entry(row.dish_id).or_default().push(row);
    }

    Ok(dishes
        .into_iter()
        .map(|model| {
            let recipe = recipes.remove(&model.id).unwrap_or_default();
            to_dish(model, recipe)
        })
        .collect())
}

/// Dish rows in a category, ordered by name.
pub async fn get_dishes_by_category(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<dish::Model>> {
    dish::Entity::find()
        .filter(dish::Column::CategoryId.eq(category_id))
        .order_by_asc(dish::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Moves a dish into a category, or out of any category with `None`.
pub async fn set_dish_category(
    db: &DatabaseConnection,
    dish_id: i64,
    category_id: Option<i64>,
) -> Result<dish::Model> {
    ensure_category_exists(db, category_id).await?;

    let model = dish::Entity::find_by_id(dish_id)
        .one(db)
        .await?
        .ok_or(Error::DishNotFound { id: dish_id })?;

    let mut active: dish::ActiveModel = model.into();
    active.category_id = Set(category_id);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

/// Replaces a dish's recipe atomically.
pub async fn set_recipe(
    db: &DatabaseConnection,
    dish_id: i64,
    recipe: Vec<RecipeEntry>,
) -> Result<Dish> {
    validate_recipe(&recipe)?;

    let txn = db.begin().await?;
    let model = dish::Entity::find_by_id(dish_id)
        .one(&txn)
        .await?
        .ok_or(Error::DishNotFound { id: dish_id })?;

    recipe_item::Entity::delete_many()
        .filter(recipe_item::Column::DishId.eq(dish_id))
        .exec(&txn)
        .await?;
    insert_recipe(&txn, dish_id, &recipe).await?;

    let mut active: dish::ActiveModel = model.into();
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    let model = active.update(&txn).await?;

    txn.commit().await?;
    Ok(Dish {
        id: model.id,
        name: model.name,
        price: model.price,
        recipe,
    })
}

/// Marks a dish as available or unavailable for sale.
pub async fn set_dish_availability(
    db: &DatabaseConnection,
    dish_id: i64,
    is_available: bool,
) -> Result<dish::Model> {
    let model = dish::Entity::find_by_id(dish_id)
        .one(db)
        .await?
        .ok_or(Error::DishNotFound { id: dish_id })?;

    let mut active: dish::ActiveModel = model.into();
    active.is_available = Set(is_available);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

/// Changes a dish's price. Orders already placed keep their price snapshot.
pub async fn update_dish_price(
    db: &DatabaseConnection,
    dish_id: i64,
    new_price: f64,
) -> Result<dish::Model> {
    validate_price(new_price)?;

    let model = dish::Entity::find_by_id(dish_id)
        .one(db)
        .await?
        .ok_or(Error::DishNotFound { id: dish_id })?;

    let mut active: dish::ActiveModel = model.into();
    active.price = Set(new_price);
    active.updated_at = Set(chrono::Utc::now().naive_utc());
    active.update(db).await.map_err(Into::into)
}

/// Deletes a dish and its recipe rows in one transaction.
pub async fn delete_dish(db: &DatabaseConnection, dish_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    recipe_item::Entity::delete_many()
        .filter(recipe_item::Column::DishId.eq(dish_id))
        .exec(&txn)
        .await?;
    let result = dish::Entity::delete_by_id(dish_id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::DishNotFound { id: dish_id });
    }

    txn.commit().await?;
    info!(dish_id, "Dish deleted.");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_create_dish_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_dish(&db, " ".to_string(), String::new(), 5.0, None, Vec::new()).await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));

        let result =
            create_dish(&db, "Soup".to_string(), String::new(), -5.0, None, Vec::new()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -5.0 }
        ));

        let result =
            create_dish(
            &db,
            "Soup".to_string(),
            String::new(),
            f64::INFINITY,
            None,
            Vec::new(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { amount: _ }));

        let result = create_dish(
            &db,
            "Soup".to_string(),
            String::new(),
            5.0,
            None,
            vec![RecipeEntry::new(1, 0.0)],
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: 0.0 }
        ));

        // Validation happens before any transaction is opened
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_and_get_dish() -> Result<()> {
        let db = setup_test_db().await?;
        let tomato = create_test_ingredient(&db, "Tomato", 10.0).await?;
        let cheese = create_test_ingredient(&db, "Cheese", 10.0).await?;

        let created = create_dish(
            &db,
            "Margherita".to_string(),
            "Classic pizza".to_string(),
            12.5,
            None,
            vec![RecipeEntry::new(tomato.id, 0.2), RecipeEntry::new(cheese.id, 0.15)],
        )
        .await?;

        let loaded = get_dish(&db, created.id).await?.unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.recipe.len(), 2);
        assert_eq!(loaded.recipe[0], RecipeEntry::new(tomato.id, 0.2));

        let model = get_dish_model(&db, created.id).await?.unwrap();
        assert_eq!(model.description, "Classic pizza");
        assert!(model.is_available);
        assert_eq!(model.category_id, None);

        assert!(get_dish(&db, 999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_dish_may_reference_unknown_ingredient() -> Result<()> {
        let db = setup_test_db().await?;

        let dish = create_test_dish(&db, "Mystery", vec![RecipeEntry::new(404, 1.0)]).await?;

        let loaded = get_dish(&db, dish.id).await?.unwrap();
        assert_eq!(loaded.recipe, vec![RecipeEntry::new(404, 1.0)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_available_dishes() -> Result<()> {
        let db = setup_test_db().await?;
        let flour = create_test_ingredient(&db, "Flour", 10.0).await?;

        let bread = create_test_dish(&db, "Bread", vec![RecipeEntry::new(flour.id, 0.5)]).await?;
        let water = create_test_dish(&db, "Water", Vec::new()).await?;
        let cake = create_test_dish(&db, "Cake", vec![RecipeEntry::new(flour.id, 0.3)]).await?;
        set_dish_availability(&db, cake.id, false).await?;

        let dishes = get_available_dishes(&db).await?;
        assert_eq!(dishes, vec![bread, water]);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_recipe_replaces_entries() -> Result<()> {
        let db = setup_test_db().await?;
        let rice = create_test_ingredient(&db, "Rice", 10.0).await?;
        let beans = create_test_ingredient(&db, "Beans", 10.0).await?;
        let dish = create_test_dish(&db, "Bowl", vec![RecipeEntry::new(rice.id, 0.2)]).await?;

        let updated = set_recipe(&db, dish.id, vec![RecipeEntry::new(beans.id, 0.3)]).await?;
        assert_eq!(updated.recipe, vec![RecipeEntry::new(beans.id, 0.3)]);

        let loaded = get_dish(&db, dish.id).await?.unwrap();
        assert_eq!(loaded.recipe, vec![RecipeEntry::new(beans.id, 0.3)]);

        let cleared = set_recipe(&db, dish.id, Vec::new()).await?;
        assert!(cleared.recipe.is_empty());
        assert!(get_dish(&db, dish.id).await?.unwrap().recipe.is_empty());

        let result = set_recipe(&db, 999, Vec::new()).await;
        assert!(matches!(result.unwrap_err(), Error::DishNotFound { id: 999 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_dish_price() -> Result<()> {
        let db = setup_test_db().await?;
        let dish = create_test_dish(&db, "Tea", Vec::new()).await?;

        let updated = update_dish_price(&db, dish.id, 3.25).await?;
        assert_eq!(updated.price, 3.25);

        let result = update_dish_price(&db, dish.id, -1.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -1.0 }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_dish_removes_recipe() -> Result<()> {
        let db = setup_test_db().await?;
        let dish = create_test_dish(&db, "Stew", vec![RecipeEntry::new(1, 1.0)]).await?;

        delete_dish(&db, dish.id).await?;
        assert!(get_dish(&db, dish.id).await?.is_none());
        let rows = recipe_item::Entity::find()
            .filter(recipe_item::Column::DishId.eq(dish.id))
            .all(&db)
            .await?;
        assert!(rows.is_empty());

        let result = delete_dish(&db, dish.id).await;
        assert!(matches!(result.unwrap_err(), Error::DishNotFound { id: _ }));
        Ok(())
    }

    #[tokio::test]
    async fn test_categories_keep_creation_order() -> Result<()> {
        let db = setup_test_db().await?;

        let pizzas = create_category(&db, "Pizzas").await?;
        let drinks = create_category(&db, " Drinks ").await?;
        assert_eq!(drinks.name, "Drinks");

        let categories = get_categories(&db).await?;
        assert_eq!(categories, vec![pizzas.clone(), drinks]);

        let found = get_category_by_name(&db, "Pizzas").await?;
        assert_eq!(found, Some(pizzas));

        let result = create_category(&db, "Pizzas").await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
        let result = create_category(&db, "  ").await;
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
        Ok(())
    }

    #[tokio::test]
    async fn test_dishes_by_category() -> Result<()> {
        let db = setup_test_db().await?;
        let pizzas = create_category(&db, "Pizzas").await?;
        let drinks = create_category(&db, "Drinks").await?;

        let marinara = create_dish(
            &db,
            "Marinara".to_string(),
            String::new(),
            9.0,
            Some(pizzas.id),
            Vec::new(),
        )
        .await?;
        let cola = create_test_dish(&db, "Cola", Vec::new()).await?;
        assert!(get_dishes_by_category(&db, drinks.id).await?.is_empty());

        set_dish_category(&db, cola.id, Some(drinks.id)).await?;
        let in_drinks = get_dishes_by_category(&db, drinks.id).await?;
        assert_eq!(in_drinks.len(), 1);
        assert_eq!(in_drinks[0].name, "Cola");

        let in_pizzas = get_dishes_by_category(&db, pizzas.id).await?;
        assert_eq!(in_pizzas.len(), 1);
        assert_eq!(in_pizzas[0].id, marinara.id);

        let cleared = set_dish_category(&db, cola.id, None).await?;
        assert_eq!(cleared.category_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_dish_rejects_unknown_category() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_dish(
            &db,
            "Ghost".to_string(),
            String::new(),
            4.0,
            Some(77),
            Vec::new(),
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::CategoryNotFound { id: 77 }));

        let dish = create_test_dish(&db, "Real", Vec::new()).await?;
        let result = set_dish_category(&db, dish.id, Some(77)).await;
        assert!(matches!(result.unwrap_err(), Error::CategoryNotFound { id: 77 }));
        Ok(())
    }
}
