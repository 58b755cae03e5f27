use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select, SqlErr, TransactionError, TransactionTrait, sea_query::Expr,
};

use painel_api_schema::{products, sale_items, sales, users};
use painel_domain::metrics::SaleFact;
use painel_domain::money::Money;
use painel_domain::period::Window;
use painel_domain::sale::SaleStatus;
use painel_domain::user::UserRole;

use crate::domain::repository::{
    ProductRepository, SaleRepository, SalesAnalyticsPort, UserRepository,
};
use crate::domain::types::{
    NewProduct, NewSale, NewUser, OAuthIdentity, OAuthProvider, Product, ProductPatch, SaleFilter, Until,
    SalePatch, SaleView, User, UserPatch,
};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Map a write error, turning a duplicate email into [`ApiError::EmailInUse`]
/// and a vanished row into `not_found`.
fn write_err(err: DbErr, context: &'static str, not_found: ApiError) -> ApiError {
    if is_unique_violation(&err) {
        return ApiError::EmailInUse;
    }
    if matches!(err, DbErr::RecordNotUpdated | DbErr::RecordNotFound(_)) {
        return not_found;
    }
    anyhow::Error::new(err).context(context).into()
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_oauth(
        &self,
        provider: OAuthProvider,
        oauth_id: &str,
    ) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::OauthProvider.eq(provider.as_str()))
            .filter(users::Column::OauthId.eq(oauth_id))
            .one(&self.db)
            .await
            .context("find user by oauth identity")?;
        model.map(user_from_model).transpose()
    }

    async fn email_taken(&self, email: &str, except: Option<i32>) -> Result<bool, ApiError> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(users::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.context("check email in use")?;
        Ok(count > 0)
    }

    async fn count_admins(&self) -> Result<u64, ApiError> {
        let count = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Admin.as_str()))
            .count(&self.db)
            .await
            .context("count admins")?;
        Ok(count)
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            avatar: Set(user.avatar.clone()),
            oauth_provider: Set(user.oauth_provider.clone()),
            oauth_id: Set(user.oauth_id.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err(e, "create user", ApiError::UserNotFound))?;
        user_from_model(model)
    }

    async fn update(&self, id: i32, patch: &UserPatch) -> Result<User, ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref name) = patch.name {
            am.name = Set(name.clone());
        }
        if let Some(ref email) = patch.email {
            am.email = Set(email.clone());
        }
        if let Some(ref hash) = patch.password_hash {
            am.password_hash = Set(hash.clone());
        }
        if let Some(role) = patch.role {
            am.role = Set(role.as_str().to_owned());
        }
        if let Some(ref avatar) = patch.avatar {
            am.avatar = Set(Some(avatar.clone()));
        }
        am.updated_at = Set(Utc::now());
        let model = am
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, "update user", ApiError::UserNotFound))?;
        user_from_model(model)
    }

    async fn link_oauth(&self, id: i32, identity: &OAuthIdentity) -> Result<User, ApiError> {
        let current = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("load user for oauth link")?
            .ok_or(ApiError::UserNotFound)?;
        let mut am = users::ActiveModel {
            id: Set(id),
            oauth_provider: Set(Some(identity.provider.as_str().to_owned())),
            oauth_id: Set(Some(identity.id.clone())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if current.avatar.is_none() && identity.picture.is_some() {
            am.avatar = Set(identity.picture.clone());
        }
        let model = am
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, "link oauth identity", ApiError::UserNotFound))?;
        user_from_model(model)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role: UserRole = model.role.parse().context("decode user role")?;
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        avatar: model.avatar,
        oauth_provider: model.oauth_provider,
        oauth_id: model.oauth_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, ApiError> {
        let mut query = products::Entity::find();
        if let Some(category) = category {
            query = query.filter(products::Column::Category.eq(category));
        }
        let models = query
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .all(&self.db)
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ApiError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let now = Utc::now();
        let model = products::ActiveModel {
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price_cents: Set(product.price.cents()),
            category: Set(product.category.clone()),
            stock: Set(product.stock),
            image: Set(product.image.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create product")?;
        Ok(product_from_model(model))
    }

    async fn update(&self, id: i32, patch: &ProductPatch) -> Result<Product, ApiError> {
        let mut am = products::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref name) = patch.name {
            am.name = Set(name.clone());
        }
        if let Some(ref description) = patch.description {
            am.description = Set(Some(description.clone()));
        }
        if let Some(price) = patch.price {
            am.price_cents = Set(price.cents());
        }
        if let Some(ref category) = patch.category {
            am.category = Set(category.clone());
        }
        if let Some(stock) = patch.stock {
            am.stock = Set(stock);
        }
        if let Some(ref image) = patch.image {
            am.image = Set(Some(image.clone()));
        }
        am.updated_at = Set(Utc::now());
        let model = am
            .update(&self.db)
            .await
            .map_err(|e| write_err(e, "update product", ApiError::ProductNotFound))?;
        Ok(product_from_model(model))
    }

    async fn count_sales(&self, id: i32) -> Result<u64, ApiError> {
        let count = sales::Entity::find()
            .filter(sales::Column::ProductId.eq(id))
            .count(&self.db)
            .await
            .context("count product sales")?;
        Ok(count)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }
}

fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: Money::from_cents(model.price_cents),
        category: model.category,
        stock: model.stock,
        image: model.image,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Sale repository ──────────────────────────────────────────────────────────

#[derive(Debug, FromQueryResult)]
struct SaleRow {
    id: i32,
    product_id: Option<i32>,
    user_id: Option<i32>,
    total_cents: i64,
    status: String,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_name: Option<String>,
    product_category: Option<String>,
    user_name: Option<String>,
}

impl SaleRow {
    fn into_view(self) -> Result<SaleView, ApiError> {
        let status: SaleStatus = self.status.parse().context("decode sale status")?;
        Ok(SaleView {
            id: self.id,
            product_id: self.product_id,
            user_id: self.user_id,
            total: Money::from_cents(self.total_cents),
            status,
            payment_method: self.payment_method,
            created_at: self.created_at,
            updated_at: self.updated_at,
            product_name: self.product_name,
            product_category: self.product_category,
            user_name: self.user_name,
        })
    }
}

/// Sales left-joined with their product and buyer, newest first.
fn sale_view_query() -> Select<sales::Entity> {
    sales::Entity::find()
        .select_only()
        .columns([
            sales::Column::Id,
            sales::Column::ProductId,
            sales::Column::UserId,
            sales::Column::TotalCents,
            sales::Column::Status,
            sales::Column::PaymentMethod,
            sales::Column::CreatedAt,
            sales::Column::UpdatedAt,
        ])
        .column_as(products::Column::Name, "product_name")
        .column_as(products::Column::Category, "product_category")
        .column_as(users::Column::Name, "user_name")
        .join(JoinType::LeftJoin, sales::Relation::Products.def())
        .join(JoinType::LeftJoin, sales::Relation::Users.def())
        .order_by_desc(sales::Column::CreatedAt)
        .order_by_desc(sales::Column::Id)
}

fn within(query: Select<sales::Entity>, window: &Window) -> Select<sales::Entity> {
    let query = query.filter(sales::Column::CreatedAt.gte(window.start));
    match window.end {
        Some(end) => query.filter(sales::Column::CreatedAt.lt(end)),
        None => query,
    }
}

/// Failure inside the sale transaction.
#[derive(Debug, thiserror::Error)]
enum RecordSaleError {
    #[error("product out of stock")]
    OutOfStock,
    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Clone)]
pub struct DbSaleRepository {
    pub db: DatabaseConnection,
}

impl DbSaleRepository {
    async fn load_view(&self, id: i32) -> Result<Option<SaleView>, ApiError> {
        let row = sale_view_query()
            .filter(sales::Column::Id.eq(id))
            .into_model::<SaleRow>()
            .one(&self.db)
            .await
            .context("find sale by id")?;
        row.map(SaleRow::into_view).transpose()
    }
}

impl SaleRepository for DbSaleRepository {
    async fn list(&self, filter: &SaleFilter) -> Result<Vec<SaleView>, ApiError> {
        let mut query = sale_view_query();
        if let Some(from) = filter.from {
            query = query.filter(sales::Column::CreatedAt.gte(from));
        }
        match filter.until {
            Some(Until::Before(end)) => query = query.filter(sales::Column::CreatedAt.lt(end)),
            Some(Until::Through(end)) => query = query.filter(sales::Column::CreatedAt.lte(end)),
            None => {}
        }
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        let rows = query
            .into_model::<SaleRow>()
            .all(&self.db)
            .await
            .context("list sales")?;
        rows.into_iter().map(SaleRow::into_view).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<SaleView>, ApiError> {
        self.load_view(id).await
    }

    async fn create_with_stock_decrement(&self, sale: &NewSale) -> Result<SaleView, ApiError> {
        let outcome = self
            .db
            .transaction::<_, i32, RecordSaleError>(|txn| {
                let sale = sale.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let decremented = products::Entity::update_many()
                        .col_expr(
                            products::Column::Stock,
                            Expr::col(products::Column::Stock).sub(1),
                        )
                        .col_expr(products::Column::UpdatedAt, Expr::value(now))
                        .filter(products::Column::Id.eq(sale.product_id))
                        .filter(products::Column::Stock.gt(0))
                        .exec(txn)
                        .await?;
                    if decremented.rows_affected == 0 {
                        return Err(RecordSaleError::OutOfStock);
                    }

                    let recorded = sales::ActiveModel {
                        product_id: Set(Some(sale.product_id)),
                        user_id: Set(Some(sale.user_id)),
                        total_cents: Set(sale.total.cents()),
                        status: Set(sale.status.as_str().to_owned()),
                        payment_method: Set(sale.payment_method.clone()),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    sale_items::ActiveModel {
                        sale_id: Set(recorded.id),
                        product_id: Set(Some(sale.product_id)),
                        quantity: Set(1),
                        price_cents: Set(sale.unit_price.cents()),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    Ok(recorded.id)
                })
            })
            .await;

        let sale_id = match outcome {
            Ok(id) => id,
            Err(TransactionError::Transaction(RecordSaleError::OutOfStock)) => {
                return Err(ApiError::OutOfStock);
            }
            Err(
                TransactionError::Transaction(RecordSaleError::Db(e))
                | TransactionError::Connection(e),
            ) => {
                return Err(anyhow::Error::new(e).context("record sale").into());
            }
        };
        self.load_view(sale_id)
            .await?
            .context("load recorded sale")
            .map_err(ApiError::from)
    }

    async fn update(&self, id: i32, patch: &SalePatch) -> Result<SaleView, ApiError> {
        let mut am = sales::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(status) = patch.status {
            am.status = Set(status.as_str().to_owned());
        }
        if let Some(ref method) = patch.payment_method {
            am.payment_method = Set(Some(method.clone()));
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db)
            .await
            .map_err(|e| write_err(e, "update sale", ApiError::SaleNotFound))?;
        self.load_view(id).await?.ok_or(ApiError::SaleNotFound)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = sales::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete sale")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Sales analytics ──────────────────────────────────────────────────────────

#[derive(Debug, FromQueryResult)]
struct FactRow {
    sale_id: i32,
    user_id: Option<i32>,
    product_id: Option<i32>,
    product_name: Option<String>,
    category: Option<String>,
    total_cents: i64,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DbSalesAnalytics {
    pub db: DatabaseConnection,
}

impl SalesAnalyticsPort for DbSalesAnalytics {
    async fn facts(&self, window: &Window) -> Result<Vec<SaleFact>, ApiError> {
        let query = sales::Entity::find()
            .select_only()
            .column_as(sales::Column::Id, "sale_id")
            .column(sales::Column::UserId)
            .column(sales::Column::ProductId)
            .column_as(products::Column::Name, "product_name")
            .column_as(products::Column::Category, "category")
            .column(sales::Column::TotalCents)
            .column(sales::Column::CreatedAt)
            .join(JoinType::LeftJoin, sales::Relation::Products.def());
        let rows = within(query, window)
            .into_model::<FactRow>()
            .all(&self.db)
            .await
            .context("load sales facts")?;
        Ok(rows
            .into_iter()
            .map(|row| SaleFact {
                sale_id: row.sale_id,
                user_id: row.user_id,
                product_id: row.product_id,
                product_name: row.product_name,
                category: row.category,
                total: Money::from_cents(row.total_cents),
                created_at: row.created_at,
            })
            .collect())
    }

    async fn recent(&self, window: &Window, limit: u64) -> Result<Vec<SaleView>, ApiError> {
        let rows = within(sale_view_query(), window)
            .limit(limit)
            .into_model::<SaleRow>()
            .all(&self.db)
            .await
            .context("load recent sales")?;
        rows.into_iter().map(SaleRow::into_view).collect()
    }
}
