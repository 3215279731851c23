use async_trait::async_trait;
use resource_actor::{ActorEntity, FrameworkError, PageRequest, ResourceActor};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Wheel {
    id: u32,
    name: String,
    weight_grams: u32,
    aged: bool,
}

#[derive(Debug)]
struct WheelCreate {
    name: String,
    weight_grams: u32,
}

#[derive(Debug)]
struct WheelUpdate {
    name: Option<String>,
    weight_grams: Option<u32>,
}

#[derive(Debug)]
struct WheelQuery {
    min_weight: u32,
}

#[derive(Debug)]
enum WheelAction {
    MarkAged,
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum WheelError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("already aged")]
    AlreadyAged,
}

#[async_trait]
impl ActorEntity for Wheel {
    type Id = u32;
    type Create = WheelCreate;
    type Update = WheelUpdate;
    type Query = WheelQuery;
    type Action = WheelAction;
    type ActionResult = bool;
    type Context = ();
    type Error = WheelError;

    fn from_create_params(id: u32, params: WheelCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            name: params.name,
            weight_grams: params.weight_grams,
            aged: false,
        })
    }

    fn matches(&self, query: &WheelQuery) -> bool {
        self.weight_grams >= query.min_weight
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), Self::Error> {
        if self.name.is_empty() {
            return Err(WheelError::EmptyName);
        }
        Ok(())
    }

    async fn on_update(&mut self, update: WheelUpdate, _ctx: &()) -> Result<(), Self::Error> {
        // Weight is applied first so a failing name check proves the copy is discarded.
        if let Some(weight) = update.weight_grams {
            self.weight_grams = weight;
        }
        if let Some(name) = update.name {
            if name.is_empty() {
                return Err(WheelError::EmptyName);
            }
            self.name = name;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: WheelAction, _ctx: &()) -> Result<bool, Self::Error> {
        match action {
            WheelAction::MarkAged => {
                if self.aged {
                    return Err(WheelError::AlreadyAged);
                }
                self.aged = true;
                Ok(true)
            }
        }
    }
}

fn create(name: &str, weight_grams: u32) -> WheelCreate {
    WheelCreate {
        name: name.to_string(),
        weight_grams,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Wheel>::new(10);
    let handle = tokio::spawn(actor.run(()));

    let id: u32 = client.create(create("Comté", 4000)).await.unwrap();
    assert_eq!(id, 1);

    let aged = client
        .perform_action(id, WheelAction::MarkAged)
        .await
        .unwrap();
    assert!(aged);

    let wheel: Wheel = client.get(id).await.unwrap().unwrap();
    assert!(wheel.aged);

    let updated = client
        .update(
            id,
            WheelUpdate {
                name: Some("Beaufort".into()),
                weight_grams: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Beaufort");
    assert_eq!(updated.weight_grams, 4000);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_ids_are_sequential() {
    let (actor, client) = ResourceActor::<Wheel>::new(10);
    tokio::spawn(actor.run(()));

    let first = client.create(create("a", 1)).await.unwrap();
    let second = client.create(create("b", 1)).await.unwrap();
    assert_eq!((first, second), (1, 2));
}

#[tokio::test]
async fn test_rejected_create_is_not_stored() {
    let (actor, client) = ResourceActor::<Wheel>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.create(create("", 500)).await.unwrap_err();
    assert_eq!(
        err.into_entity_error::<WheelError>().unwrap(),
        WheelError::EmptyName
    );

    let page = client
        .list(WheelQuery { min_weight: 0 }, PageRequest::all())
        .await
        .unwrap();
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn test_rejected_update_leaves_entity_untouched() {
    let (actor, client) = ResourceActor::<Wheel>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(create("Morbier", 6000)).await.unwrap();
    let result = client
        .update(
            id,
            WheelUpdate {
                name: Some(String::new()),
                weight_grams: Some(1),
            },
        )
        .await;
    assert!(result.is_err());

    let stored = client.get(id).await.unwrap().unwrap();
    assert_eq!(stored.weight_grams, 6000);
    assert_eq!(stored.name, "Morbier");
}

#[tokio::test]
async fn test_update_of_missing_entity_is_not_found() {
    let (actor, client) = ResourceActor::<Wheel>::new(10);
    tokio::spawn(actor.run(()));

    let result = client
        .update(
            42,
            WheelUpdate {
                name: None,
                weight_grams: None,
            },
        )
        .await;
    assert!(matches!(result, Err(FrameworkError::NotFound(id)) if id == "42"));
}

#[tokio::test]
async fn test_list_filters_and_paginates_in_id_order() {
    let (actor, client) = ResourceActor::<Wheel>::new(10);
    tokio::spawn(actor.run(()));

    for weight in [100, 900, 200, 800, 700] {
        client.create(create("w", weight)).await.unwrap();
    }

    let page = client
        .list(WheelQuery { min_weight: 500 }, PageRequest::new(1, 2))
        .await
        .unwrap();
    assert_eq!(page.total_items, 3);
    assert_eq!(page.last_page(), 2);
    let ids: Vec<u32> = page.items.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![2, 4]);

    let second = client
        .list(WheelQuery { min_weight: 500 }, PageRequest::new(2, 2))
        .await
        .unwrap();
    let ids: Vec<u32> = second.items.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![5]);
}

#[tokio::test]
async fn test_failed_action_surfaces_entity_error() {
    let (actor, client) = ResourceActor::<Wheel>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(create("Tomme", 1500)).await.unwrap();
    client
        .perform_action(id, WheelAction::MarkAged)
        .await
        .unwrap();
    let err = client
        .perform_action(id, WheelAction::MarkAged)
        .await
        .unwrap_err();
    assert_eq!(
        err.into_entity_error::<WheelError>().unwrap(),
        WheelError::AlreadyAged
    );
}

#[tokio::test]
async fn test_closed_actor_is_reported() {
    let (actor, client) = ResourceActor::<Wheel>::new(10);
    drop(actor);

    let result = client.get(1).await;
    assert!(matches!(result, Err(FrameworkError::ActorClosed)));
}
