//! Order pricing and delivery tracking

use chrono::Utc;
use domain_products::{Product, ProductRepository, ProductService};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TransportError, TransportResult};
use crate::models::{
    CreateOrder, OrderLine, OrderTotals, Transport, TransportChanges, TransportStatus, UpdateOrder,
};
use crate::repository::TransportRepository;

pub struct TransportService<T: TransportRepository, P: ProductRepository> {
    repository: Arc<T>,
    products: ProductService<P>,
}

impl<T: TransportRepository, P: ProductRepository> Clone for TransportService<T, P> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            products: self.products.clone(),
        }
    }
}

impl<T: TransportRepository, P: ProductRepository> TransportService<T, P> {
    pub fn new(repository: T, products: ProductService<P>) -> Self {
        Self {
            repository: Arc::new(repository),
            products,
        }
    }

    async fn products_for(&self, lines: &[OrderLine]) -> TransportResult<HashMap<Uuid, Product>> {
        let ids = lines.iter().map(|line| line.product).collect();
        Ok(self
            .products
            .get_many(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }

    /// Sums unit weight, volume and price over the lines. Every product must exist.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn calculate_totals(&self, lines: &[OrderLine]) -> TransportResult<OrderTotals> {
        let products = self.products_for(lines).await?;
        let mut totals = OrderTotals::default();

        for line in lines {
            let product = products
                .get(&line.product)
                .ok_or(TransportError::ProductNotFound(line.product))?;
            totals.add(product, line.quantity);
        }

        tracing::debug!(
            total_weight = totals.total_weight,
            total_volume = totals.total_volume,
            total_value = totals.total_value,
            "Order totals calculated"
        );
        Ok(totals)
    }

    /// Checks each line against the product's unallocated quantity. Nothing is reserved.
    #[instrument(skip(self, lines))]
    pub async fn validate_stock(&self, lines: &[OrderLine]) -> TransportResult<()> {
        let products = self.products_for(lines).await?;

        for line in lines {
            let product = products
                .get(&line.product)
                .ok_or(TransportError::ProductNotFound(line.product))?;
            if product.quantity < line.quantity {
                return Err(TransportError::InsufficientStock {
                    name: product.name.clone(),
                    available: product.quantity,
                    requested: line.quantity,
                });
            }
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(package_id = %input.package_id))]
    pub async fn create_order(&self, input: CreateOrder) -> TransportResult<Transport> {
        input
            .validate()
            .map_err(|e| TransportError::Validation(e.to_string()))?;

        let totals = if input.products.is_empty() {
            OrderTotals::default()
        } else {
            let totals = self.calculate_totals(&input.products).await?;
            self.validate_stock(&input.products).await?;
            totals
        };

        self.repository.create(Transport::new(input, totals)).await
    }

    /// Applies the changes, recomputing totals when the product list is replaced.
    #[instrument(skip(self, input))]
    pub async fn update_order(&self, id: Uuid, input: UpdateOrder) -> TransportResult<Transport> {
        input
            .validate()
            .map_err(|e| TransportError::Validation(e.to_string()))?;

        let totals = match &input.products {
            Some(lines) => Some(self.calculate_totals(lines).await?),
            None => None,
        };

        self.repository
            .update(
                id,
                TransportChanges {
                    order: input,
                    totals,
                },
            )
            .await?
            .ok_or(TransportError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn get_transport(&self, id: Uuid) -> TransportResult<Transport> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TransportError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_transports(&self) -> TransportResult<Vec<Transport>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn list_by_status(&self, status: TransportStatus) -> TransportResult<Vec<Transport>> {
        self.repository.list_by_status(status).await
    }

    #[instrument(skip(self))]
    pub async fn list_overdue(&self) -> TransportResult<Vec<Transport>> {
        self.repository.list_overdue(Utc::now()).await
    }

    #[instrument(skip(self))]
    pub async fn list_assigned(&self, user_id: Uuid) -> TransportResult<Vec<Transport>> {
        self.repository.list_by_assignee(user_id).await
    }

    /// Sets any status directly; there is no transition check.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: Uuid, status: TransportStatus) -> TransportResult<Transport> {
        let changes = TransportChanges {
            order: UpdateOrder {
                status: Some(status),
                ..Default::default()
            },
            totals: None,
        };
        self.repository
            .update(id, changes)
            .await?
            .ok_or(TransportError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_transport(&self, id: Uuid) -> TransportResult<()> {
        if !self.repository.delete(id).await? {
            return Err(TransportError::NotFound(id));
        }
        tracing::info!(transport_id = %id, "Transport cancelled");
        Ok(())
    }
}
