use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        client::{Client, NewClient, UpdateClient},
        client_request::InlineRequest,
        types::{ClientId, ClientName},
    },
    models::{
        client::{Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient},
        client_request::NewClientRequest as DbNewClientRequest,
    },
    repository::{
        ClientListQuery, ClientReader, ClientWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(Client::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn get_client_by_name(&self, name: &ClientName) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .filter(clients::name.eq(name.as_str()))
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(Client::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let since = query.created.since(Utc::now().naive_utc());

        let query_builder = || {
            let mut items = clients::table.into_boxed::<Sqlite>();

            if let Some(term) = &query.search {
                let pattern = format!("%{term}%");
                items = items.filter(
                    clients::name
                        .like(pattern.clone())
                        .or(clients::email.like(pattern.clone()))
                        .or(clients::contact_number.like(pattern.clone()))
                        .or(clients::company_url.like(pattern)),
                );
            }
            if let Some(is_active) = query.is_active {
                items = items.filter(clients::is_active.eq(is_active));
            }
            if let Some(since) = since {
                items = items.filter(clients::created_at.ge(since));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((clients::created_at.desc(), clients::id.desc()));
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let clients = items
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(Client::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(RepositoryError::from)?;

        Ok((total, clients))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let insertable: DbNewClient = new_client.into();

        let created = diesel::insert_into(clients::table)
            .values(&insertable)
            .get_result::<DbClient>(&mut conn)?;

        Client::try_from(created).map_err(RepositoryError::from)
    }

    fn update_client(&self, id: ClientId, updates: &UpdateClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let db_updates: DbUpdateClient = updates.into();

        let updated = diesel::update(clients::table.find(id.get()))
            .set(&db_updates)
            .get_result::<DbClient>(&mut conn)?;

        Client::try_from(updated).map_err(RepositoryError::from)
    }

    fn create_client_with_request(
        &self,
        new_client: &NewClient,
        request: Option<InlineRequest>,
    ) -> RepositoryResult<Client> {
        use crate::schema::{client_requests, clients};

        let mut conn = self.conn()?;
        let insertable: DbNewClient = new_client.into();

        conn.transaction::<Client, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(clients::table)
                .values(&insertable)
                .get_result::<DbClient>(conn)?;
            let client = Client::try_from(created)?;

            if let Some(request) = &request {
                let new_request = request.for_client(client.id);
                diesel::insert_into(client_requests::table)
                    .values(&DbNewClientRequest::from(&new_request))
                    .execute(conn)?;
            }
            Ok(client)
        })
    }

    fn update_client_with_request(
        &self,
        id: ClientId,
        updates: &UpdateClient,
        request: Option<InlineRequest>,
    ) -> RepositoryResult<Client> {
        use crate::schema::{client_requests, clients};

        let mut conn = self.conn()?;
        let db_updates: DbUpdateClient = updates.into();

        conn.transaction::<Client, RepositoryError, _>(|conn| {
            let updated = diesel::update(clients::table.find(id.get()))
                .set(&db_updates)
                .get_result::<DbClient>(conn)?;
            let client = Client::try_from(updated)?;

            if let Some(request) = &request {
                let new_request = request.for_client(client.id);
                diesel::insert_into(client_requests::table)
                    .values(&DbNewClientRequest::from(&new_request))
                    .execute(conn)?;
            }
            Ok(client)
        })
    }

    fn delete_client(&self, id: ClientId) -> RepositoryResult<()> {
        use crate::schema::{client_requests, clients};

        let mut conn = self.conn()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            diesel::delete(client_requests::table.filter(client_requests::client_id.eq(id.get())))
                .execute(conn)?;
            let deleted = diesel::delete(clients::table.find(id.get())).execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            Ok(())
        })
        .map_err(RepositoryError::from)
    }
}
