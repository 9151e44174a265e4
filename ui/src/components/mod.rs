pub mod category_fields;
pub mod product_form;
