use serde::{Deserialize, Serialize};

use super::category::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub stock: i32,
    /// 外键, 不对外输出
    #[serde(skip)]
    pub category_id: Option<i64>,
    /// 读取时通过关联查询得到的分类快照, 不随商品持久化
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// 创建/更新商品时可写的字段
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    pub stock: i32,
    pub category_id: Option<i64>,
}

impl ProductInput {
    pub fn new(name: impl Into<String>, price: f64, stock: i32) -> Self {
        Self {
            name: name.into(),
            price,
            stock,
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id).filter(|id| *id != 0);
        self
    }

    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            stock: self.stock,
            category_id: self.category_id,
            category: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_category_means_uncategorized() {
        let input = ProductInput::new("Phone", 100.0, 5).with_category(0);
        assert_eq!(input.category_id, None);

        let input = ProductInput::new("Phone", 100.0, 5).with_category(3);
        assert_eq!(input.category_id, Some(3));
    }

    #[test]
    fn test_product_json_hides_category_id() {
        let mut product = ProductInput::new("Phone", 100.0, 5)
            .with_category(1)
            .into_product(7);
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("category_id").is_none());
        assert!(json.get("category").is_none());

        product.category = Some(Category {
            id: 1,
            name: "Electronics".to_string(),
            description: String::new(),
        });
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["category"]["name"], "Electronics");
    }
}
