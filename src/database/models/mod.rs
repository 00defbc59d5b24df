pub mod drink;

pub use drink::{Drink, DrinkChanges, DrinkRow, DrinkShort, Ingredient, IngredientShort, NewDrink};
