//! MongoDB-backed store.

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{
    BusRoute, BusService, BusStop, BusStopCode, Direction, RatingSummary, ServiceNo, ServiceRating,
    ServiceStop,
};
use crate::geo::BoundingBox;

use super::{BUS_ROUTES, BUS_SERVICE_RATINGS, BUS_SERVICES, BUS_STOPS, BusStore, StoreError};

/// Store backed by a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

/// Rating as written to `bus_service_ratings`, with a native BSON date.
#[derive(Serialize)]
struct RatingDocument<'a> {
    #[serde(rename = "ServiceNo")]
    service_no: &'a str,
    #[serde(rename = "Direction")]
    direction: i32,
    #[serde(rename = "Rating")]
    rating: i32,
    #[serde(rename = "Comment", skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    #[serde(
        rename = "CreatedAt",
        serialize_with = "bson::serde_helpers::chrono_datetime_as_bson_datetime::serialize"
    )]
    created_at: DateTime<Utc>,
}

/// Output of the rating `$group` stage.
#[derive(Deserialize)]
struct SummaryDocument {
    #[serde(rename = "AverageRating")]
    average: Option<f64>,
    #[serde(rename = "NumberOfRatings")]
    count: i64,
}

impl MongoStore {
    /// Connect to a MongoDB deployment and select a database.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(client.database(database)))
    }

    /// Wrap an existing database handle.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Round-trip to the server to check it is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    /// Create the indexes the queries rely on. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let index = |keys: Document| IndexModel::builder().keys(keys).build();

        self.db
            .collection::<Document>(BUS_STOPS)
            .create_indexes(
                vec![
                    index(doc! { "BusStopCode": 1 }),
                    index(doc! { "RoadName": 1 }),
                    index(doc! { "Latitude": 1, "Longitude": 1 }),
                ],
                None,
            )
            .await?;

        self.db
            .collection::<Document>(BUS_ROUTES)
            .create_indexes(
                vec![
                    index(doc! { "ServiceNo": 1, "Direction": 1, "StopSequence": 1 }),
                    index(doc! { "BusStopCode": 1 }),
                ],
                None,
            )
            .await?;

        self.db
            .collection::<Document>(BUS_SERVICES)
            .create_index(index(doc! { "ServiceNo": 1, "Direction": 1 }), None)
            .await?;

        self.db
            .collection::<Document>(BUS_SERVICE_RATINGS)
            .create_index(index(doc! { "ServiceNo": 1, "Direction": 1 }), None)
            .await?;

        info!("ensured indexes on {}", self.db.name());
        Ok(())
    }

    fn stops(&self) -> Collection<BusStop> {
        self.db.collection(BUS_STOPS)
    }

    fn routes(&self) -> Collection<BusRoute> {
        self.db.collection(BUS_ROUTES)
    }

    fn services(&self) -> Collection<BusService> {
        self.db.collection(BUS_SERVICES)
    }

    fn ratings(&self) -> Collection<Document> {
        self.db.collection(BUS_SERVICE_RATINGS)
    }

    fn without_id() -> Document {
        doc! { "_id": 0 }
    }

    async fn find_sorted_stops(&self, filter: Document) -> Result<Vec<BusStop>, StoreError> {
        let options = FindOptions::builder()
            .projection(Self::without_id())
            .sort(doc! { "BusStopCode": 1 })
            .build();
        let stops = self.stops().find(filter, options).await?.try_collect().await?;
        Ok(stops)
    }
}

fn service_filter(service_no: &ServiceNo, direction: Direction) -> Document {
    doc! { "ServiceNo": service_no.as_str(), "Direction": direction.as_i32() }
}

/// Route entries for one service joined with their stops, in stop order.
fn service_stops_pipeline(service_no: &ServiceNo, direction: Direction) -> Vec<Document> {
    vec![
        doc! { "$match": service_filter(service_no, direction) },
        doc! { "$sort": { "StopSequence": 1 } },
        doc! { "$lookup": {
            "from": BUS_STOPS,
            "localField": "BusStopCode",
            "foreignField": "BusStopCode",
            "as": "Stop",
        } },
        // drops route entries without a matching stop
        doc! { "$unwind": "$Stop" },
        doc! { "$replaceRoot": { "newRoot": { "$mergeObjects": [
            "$Stop",
            { "StopSequence": "$StopSequence", "Distance": "$Distance" },
        ] } } },
        doc! { "$project": { "_id": 0 } },
    ]
}

/// Average and count of a service's ratings, as at most one document.
fn rating_summary_pipeline(service_no: &ServiceNo, direction: Direction) -> Vec<Document> {
    vec![
        doc! { "$match": service_filter(service_no, direction) },
        doc! { "$group": {
            "_id": null,
            "AverageRating": { "$avg": "$Rating" },
            "NumberOfRatings": { "$sum": 1 },
        } },
    ]
}

fn rating_document(rating: &ServiceRating) -> Result<Document, StoreError> {
    bson::to_document(&RatingDocument {
        service_no: rating.service_no.as_str(),
        direction: rating.direction.as_i32(),
        rating: i32::from(rating.rating.value()),
        comment: rating.comment.as_deref(),
        created_at: rating.created_at,
    })
    .map_err(|e| StoreError::Encode(e.to_string()))
}

impl BusStore for MongoStore {
    async fn find_stop(&self, code: &BusStopCode) -> Result<Option<BusStop>, StoreError> {
        let options = FindOneOptions::builder()
            .projection(Self::without_id())
            .build();
        let stop = self
            .stops()
            .find_one(doc! { "BusStopCode": code.as_str() }, options)
            .await?;
        Ok(stop)
    }

    async fn find_stops(&self, codes: &[BusStopCode]) -> Result<Vec<BusStop>, StoreError> {
        let codes: Vec<&str> = codes.iter().map(BusStopCode::as_str).collect();
        self.find_sorted_stops(doc! { "BusStopCode": { "$in": codes } })
            .await
    }

    async fn stops_in_box(&self, bbox: &BoundingBox) -> Result<Vec<BusStop>, StoreError> {
        debug!(?bbox, "querying stops in bounding box");
        self.find_sorted_stops(doc! {
            "Latitude": { "$gte": bbox.min_lat, "$lte": bbox.max_lat },
            "Longitude": { "$gte": bbox.min_lng, "$lte": bbox.max_lng },
        })
        .await
    }

    async fn stops_on_road(&self, road_name: &str) -> Result<Vec<BusStop>, StoreError> {
        self.find_sorted_stops(doc! { "RoadName": road_name }).await
    }

    async fn find_service(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> Result<Option<BusService>, StoreError> {
        let options = FindOneOptions::builder()
            .projection(Self::without_id())
            .build();
        let service = self
            .services()
            .find_one(service_filter(service_no, direction), options)
            .await?;
        Ok(service)
    }

    async fn service_stops(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> Result<Vec<ServiceStop>, StoreError> {
        self.routes()
            .aggregate(service_stops_pipeline(service_no, direction), None)
            .await?
            .map_err(StoreError::from)
            .and_then(|d| async move {
                bson::from_document::<ServiceStop>(d).map_err(|e| StoreError::Decode {
                    collection: BUS_ROUTES,
                    message: e.to_string(),
                })
            })
            .try_collect()
            .await
    }

    async fn route(&self, service_no: &ServiceNo, direction: Direction) -> Result<Vec<BusRoute>, StoreError> {
        let options = FindOptions::builder()
            .projection(Self::without_id())
            .sort(doc! { "StopSequence": 1 })
            .build();
        let route = self
            .routes()
            .find(service_filter(service_no, direction), options)
            .await?
            .try_collect()
            .await?;
        Ok(route)
    }

    async fn all_routes(&self) -> Result<Vec<BusRoute>, StoreError> {
        let options = FindOptions::builder()
            .projection(Self::without_id())
            .build();
        let routes: Vec<BusRoute> = self.routes().find(doc! {}, options).await?.try_collect().await?;
        debug!(count = routes.len(), "loaded all route entries");
        Ok(routes)
    }

    async fn rating_summary(
        &self,
        service_no: &ServiceNo,
        direction: Direction,
    ) -> Result<RatingSummary, StoreError> {
        let mut cursor = self
            .ratings()
            .aggregate(rating_summary_pipeline(service_no, direction), None)
            .await?;
        let Some(group) = cursor.try_next().await? else {
            return Ok(RatingSummary::default());
        };

        let summary: SummaryDocument =
            bson::from_document(group).map_err(|e| StoreError::Decode {
                collection: BUS_SERVICE_RATINGS,
                message: e.to_string(),
            })?;

        Ok(RatingSummary {
            average: summary.average,
            count: summary.count.max(0) as u64,
        })
    }

    async fn insert_rating(&self, rating: &ServiceRating) -> Result<(), StoreError> {
        let document = rating_document(rating)?;

        self.ratings().insert_one(document, None).await?;
        Ok(())
    }
}
